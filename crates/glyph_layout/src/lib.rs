//! # Glyph Layout
//!
//! Text layout for bitmap (and MSDF) fonts. A string is shaped, reordered
//! for right-to-left runs, word-wrapped and placed glyph by glyph with
//! kerning, letter spacing and alignment. The result is a list of positioned
//! glyphs plus typographic metrics, ready for a renderer to turn into quads.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glyph_layout::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let font = Arc::new(BitmapFont::load("resources/fonts/demo_font.ron")?);
//!     let layout = TextLayout::new(
//!         LayoutOptions::new(font)
//!             .with_text("Hello\nworld")
//!             .with_align(Align::Center),
//!     )?;
//!
//!     println!("{} glyphs, {:?}", layout.glyphs().len(), layout.metrics());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod text;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::math::Vec2,
        text::{
            Align, BitmapFont, Glyph, LayoutError, LayoutMetrics, LayoutOptions,
            PositionedGlyph, TextLayout, WrapMode,
        },
    };
}
