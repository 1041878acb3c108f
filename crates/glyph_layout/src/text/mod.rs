//! Bitmap-font text layout
//!
//! # Architecture
//!
//! - [`BitmapFont`]: pre-parsed glyph, kerning and font-wide metrics
//! - [`GlyphLookup`]: glyph lookup with synthesized tab and space fallbacks
//! - [`script`]: Arabic-range detection and display reordering
//! - [`Shaper`]: contextual shaping applied before reordering
//! - [`word_wrap`]: greedy line breaking over a measurement callback
//! - [`TextLayout`]: wraps, places and measures glyphs for one string
//!
//! Turning [`PositionedGlyph`]s into vertex and UV buffers is left to the
//! renderer.

pub mod font;
pub mod glyph_lookup;
pub mod metrics;
pub mod script;
pub mod shaping;
pub mod text_layout;
pub mod word_wrap;

pub use font::{BitmapFont, FontCommon, FontError, FontInfo, FontResult, Glyph};
pub use glyph_lookup::GlyphLookup;
pub use metrics::LayoutMetrics;
pub use script::{contains_rtl, reorder_for_display};
pub use shaping::{ArabicShaper, NoShaping, Shaper};
pub use text_layout::{
    measure_span, Align, LayoutError, LayoutOptions, LayoutResult, MeasureFn, PositionedGlyph,
    TextLayout,
};
pub use word_wrap::{LineSpan, WrapMode, WrapOptions};
