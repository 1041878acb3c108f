//! Text layout engine
//!
//! Turns a string into positioned glyphs for a bitmap font. A layout pass
//! shapes and reorders right-to-left runs, wraps the text into lines using
//! the font's own measurements, then walks each line placing glyphs with
//! kerning, letter spacing and alignment.
//!
//! # Layout Coordinate System
//!
//! - Positions are in font units
//! - The first line's pen starts at `y = -height`, so the last baseline sits
//!   near `y = 0`
//! - Each following line moves down by the line height (+Y)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use glyph_layout::text::{BitmapFont, LayoutOptions, TextLayout, Align};
//!
//! let font = Arc::new(BitmapFont::load("resources/fonts/demo_font.ron")?);
//! let options = LayoutOptions::new(font)
//!     .with_text("Hello world")
//!     .with_width(200.0)
//!     .with_align(Align::Center);
//!
//! let layout = TextLayout::new(options)?;
//! for glyph in layout.glyphs() {
//!     println!("{} at {:?}", glyph.index, glyph.position);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::font::{BitmapFont, FontError, Glyph};
use super::glyph_lookup::GlyphLookup;
use super::metrics::LayoutMetrics;
use super::script;
use super::shaping::{ArabicShaper, Shaper};
use super::word_wrap::{self, LineSpan, WrapMode, WrapOptions};
use crate::config::Config;
use crate::foundation::math::Vec2;

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that abort a layout pass
///
/// Missing glyphs, empty text and fonts without a glyph table are not
/// errors; they produce smaller or empty output.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// No font was supplied
    #[error("must provide a valid bitmap font")]
    MissingFont,

    /// The font constants cannot drive a layout
    #[error("Invalid font: {0}")]
    InvalidFont(#[from] FontError),
}

/// Horizontal alignment of lines against the widest line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush left
    #[default]
    Left,
    /// Centered
    Center,
    /// Flush right
    Right,
}

impl Align {
    /// Share of the free line space placed before the line
    pub fn factor(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// Options for one layout pass
///
/// Everything except the font can be read from a config file; the font is
/// attached afterwards with [`LayoutOptions::with_font`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Font to lay out with
    #[serde(skip)]
    pub font: Option<Arc<BitmapFont>>,
    /// Text to lay out
    pub text: String,
    /// Line alignment
    pub align: Align,
    /// Wrapping width; `None` never wraps and caps the result at 560 units
    pub width: Option<f32>,
    /// Overrides the font's line height
    pub line_height: Option<f32>,
    /// Extra advance added after every glyph
    pub letter_spacing: f32,
    /// Tab width in multiples of the space advance
    pub tab_size: f32,
    /// Line breaking mode
    pub mode: WrapMode,
    /// First character index to lay out
    pub start: usize,
    /// End of the laid out range; `None` is the end of the text
    pub end: Option<usize>,
    /// Shape Arabic-script text into presentation forms before reordering
    pub shaping: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            font: None,
            text: String::new(),
            align: Align::Left,
            width: None,
            line_height: None,
            letter_spacing: 0.0,
            tab_size: 4.0,
            mode: WrapMode::Normal,
            start: 0,
            end: None,
            shaping: true,
        }
    }
}

impl Config for LayoutOptions {}

impl LayoutOptions {
    /// Create options for `font` with default settings
    pub fn new(font: Arc<BitmapFont>) -> Self {
        Self {
            font: Some(font),
            ..Default::default()
        }
    }

    /// Set the font
    pub fn with_font(mut self, font: Arc<BitmapFont>) -> Self {
        self.font = Some(font);
        self
    }

    /// Set the text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the alignment
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the wrapping width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Override the font's line height
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Set the letter spacing
    pub fn with_letter_spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    /// Set the tab size
    pub fn with_tab_size(mut self, tab_size: f32) -> Self {
        self.tab_size = tab_size;
        self
    }

    /// Set the line breaking mode
    pub fn with_mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Restrict layout to a character range
    pub fn with_range(mut self, start: usize, end: Option<usize>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Enable or disable shaping of Arabic-script text
    pub fn with_shaping(mut self, shaping: bool) -> Self {
        self.shaping = shaping;
        self
    }
}

/// A glyph placed by the layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionedGlyph {
    /// Pen position, alignment offset included
    pub position: Vec2,
    /// Glyph metrics from the font (or a synthesized fallback)
    pub glyph: Glyph,
    /// Character index in the laid out text
    pub index: usize,
    /// Line the glyph belongs to
    pub line: usize,
}

/// Measure how many characters of `text[start..end]` fit within `width`
///
/// Characters without a glyph count towards the span but add no width. The
/// last glyph's horizontal offset is added so the width reaches its rendered
/// right edge rather than its pen advance.
pub fn measure_span(
    lookup: &GlyphLookup<'_>,
    letter_spacing: f32,
    text: &[char],
    start: usize,
    end: usize,
    width: f32,
) -> LineSpan {
    let font = lookup.font();
    if !font.has_glyph_table() {
        return LineSpan { start, end: start, width: 0.0 };
    }

    let end = end.min(text.len());
    let mut pen = 0.0;
    let mut line_width = 0.0;
    let mut count = 0;
    let mut last_glyph: Option<Glyph> = None;

    for &ch in text.get(start..end).unwrap_or_default() {
        if let Some(glyph) = lookup.get_glyph(ch) {
            if let Some(last) = last_glyph {
                pen += font.kerning(last.id, glyph.id);
            }

            let next_pen = pen + glyph.x_advance + letter_spacing;
            let next_width = pen + glyph.width;

            // Hit the limit; this glyph does not fit
            if next_width >= width || next_pen >= width {
                break;
            }

            pen = next_pen;
            line_width = next_width;
            last_glyph = Some(glyph);
        }
        count += 1;
    }

    if let Some(last) = last_glyph {
        line_width += last.x_offset;
    }

    LineSpan {
        start,
        end: start + count,
        width: line_width,
    }
}

/// Caller-supplied line measurement, with the contract of [`word_wrap::lines`]
pub type MeasureFn = Box<dyn Fn(&[char], usize, usize, f32) -> LineSpan + Send + Sync>;

/// Positioned glyphs and metrics for one string
///
/// Each call to [`TextLayout::update`] rebuilds the whole result.
pub struct TextLayout {
    options: LayoutOptions,
    shaper: Box<dyn Shaper>,
    measure: Option<MeasureFn>,
    text: String,
    glyphs: Vec<PositionedGlyph>,
    metrics: LayoutMetrics,
}

impl fmt::Debug for TextLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLayout")
            .field("text", &self.text)
            .field("glyphs", &self.glyphs.len())
            .field("metrics", &self.metrics)
            .field("custom_measure", &self.measure.is_some())
            .finish_non_exhaustive()
    }
}

impl TextLayout {
    /// Lay out text with the default Arabic shaper
    pub fn new(options: LayoutOptions) -> LayoutResult<Self> {
        Self::with_shaper(options, Box::new(ArabicShaper))
    }

    /// Lay out text with a custom shaper for right-to-left runs
    pub fn with_shaper(options: LayoutOptions, shaper: Box<dyn Shaper>) -> LayoutResult<Self> {
        Self::build(options, shaper, None)
    }

    /// Lay out text, breaking lines with `measure` instead of the font metrics
    ///
    /// Glyphs are still placed with the font; `measure` only decides where
    /// lines break and how wide each line is for alignment.
    pub fn with_measure<F>(options: LayoutOptions, measure: F) -> LayoutResult<Self>
    where
        F: Fn(&[char], usize, usize, f32) -> LineSpan + Send + Sync + 'static,
    {
        Self::build(options, Box::new(ArabicShaper), Some(Box::new(measure)))
    }

    fn build(
        options: LayoutOptions,
        shaper: Box<dyn Shaper>,
        measure: Option<MeasureFn>,
    ) -> LayoutResult<Self> {
        let mut layout = Self {
            options: LayoutOptions::default(),
            shaper,
            measure,
            text: String::new(),
            glyphs: Vec::new(),
            metrics: LayoutMetrics::default(),
        };
        layout.update(options)?;
        Ok(layout)
    }

    /// Re-run the layout with new options
    ///
    /// On error the previous result is left untouched.
    pub fn update(&mut self, options: LayoutOptions) -> LayoutResult<()> {
        let font = options.font.clone().ok_or(LayoutError::MissingFont)?;
        font.validate()?;

        if !font.has_glyph_table() {
            log::warn!("Font has no glyph table; layout will be empty");
        }

        let text = self.display_text_for(&options);
        let chars: Vec<char> = text.chars().collect();
        let lookup = GlyphLookup::new(&font, options.tab_size);
        let letter_spacing = options.letter_spacing;

        let wrap_options = WrapOptions {
            width: options.width,
            start: options.start,
            end: options.end,
            mode: options.mode,
        };
        let lines = word_wrap::lines(&chars, &wrap_options, |text, start, end, width| {
            match &self.measure {
                Some(measure) => measure(text, start, end, width),
                None => measure_span(&lookup, letter_spacing, text, start, end, width),
            }
        });

        let max_line_width = lines.iter().fold(0.0_f32, |widest, line| widest.max(line.width));
        let metrics = LayoutMetrics::derive(
            &font,
            options.line_height,
            lines.len(),
            max_line_width,
            options.width,
        );

        let glyphs = place_glyphs(
            &lookup,
            &chars,
            &lines,
            max_line_width,
            &metrics,
            options.align,
            letter_spacing,
        );

        log::debug!(
            "Laid out {} chars into {} lines, {} glyphs, {}x{}",
            chars.len(),
            metrics.line_count,
            glyphs.len(),
            metrics.width,
            metrics.height
        );

        self.options = options;
        self.text = text;
        self.glyphs = glyphs;
        self.metrics = metrics;
        Ok(())
    }

    /// Text in display order: shaped and reordered when it holds RTL runs
    fn display_text_for(&self, options: &LayoutOptions) -> String {
        if !script::contains_rtl(&options.text) {
            return options.text.clone();
        }
        let shaped = if options.shaping {
            self.shaper.shape(&options.text)
        } else {
            options.text.clone()
        };
        script::reorder_for_display(&shaped)
    }

    /// Measure `text[start..end]` with the current font and letter spacing,
    /// or with the custom measure when one was supplied
    ///
    /// Character indices count `char`s, not bytes.
    pub fn measure(&self, text: &str, start: usize, end: usize, width: f32) -> LineSpan {
        let chars: Vec<char> = text.chars().collect();
        if let Some(measure) = &self.measure {
            return measure(&chars, start, end, width);
        }
        let Some(font) = self.options.font.as_deref() else {
            return LineSpan { start, end: start, width: 0.0 };
        };
        let lookup = GlyphLookup::new(font, self.options.tab_size);
        measure_span(&lookup, self.options.letter_spacing, &chars, start, end, width)
    }

    /// Positioned glyphs in layout order
    pub fn glyphs(&self) -> &[PositionedGlyph] {
        &self.glyphs
    }

    /// Metrics of the current layout
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// The text the glyph indices refer to, after shaping and reordering
    pub fn display_text(&self) -> &str {
        &self.text
    }

    /// Options used for the current layout
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Widest line, capped at the configured width
    pub fn width(&self) -> f32 {
        self.metrics.width
    }

    /// Total height of all lines
    pub fn height(&self) -> f32 {
        self.metrics.height
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.metrics.line_count
    }
}

/// Walk each line, placing every glyph the font can provide
fn place_glyphs(
    lookup: &GlyphLookup<'_>,
    chars: &[char],
    lines: &[LineSpan],
    max_line_width: f32,
    metrics: &LayoutMetrics,
    align: Align,
    letter_spacing: f32,
) -> Vec<PositionedGlyph> {
    let font = lookup.font();
    let mut glyphs = Vec::with_capacity(chars.len());

    // Draw text along the baseline
    let mut y = -metrics.height;

    for (line_index, line) in lines.iter().enumerate() {
        let offset = (max_line_width - line.width) * align.factor();
        let mut x = 0.0;
        let mut last_glyph: Option<Glyph> = None;

        for index in line.start..line.end {
            let Some(&ch) = chars.get(index) else {
                break;
            };
            let Some(glyph) = lookup.get_glyph(ch) else {
                log::trace!("No glyph for {:?} at index {}, skipping", ch, index);
                continue;
            };

            if let Some(last) = last_glyph {
                x += font.kerning(last.id, glyph.id);
            }

            glyphs.push(PositionedGlyph {
                position: Vec2::new(x + offset, y),
                glyph,
                index,
                line: line_index,
            });

            x += glyph.x_advance + letter_spacing;
            last_glyph = Some(glyph);
        }

        // Next line down
        y += metrics.line_height;
    }

    glyphs
}
