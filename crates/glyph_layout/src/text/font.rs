//! Bitmap font description
//!
//! Pre-parsed BMFont-style metrics: a glyph table keyed by character, a
//! kerning table keyed by glyph id pairs, and font-wide constants. Layout only
//! reads this data; it never parses font files or touches the atlas texture.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// Result type for font description operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while loading or validating a font description
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to parse the font description text
    #[error("Failed to parse font description: {0}")]
    Parse(String),

    /// Font constants cannot be used for layout
    #[error("Invalid font description: {0}")]
    Invalid(String),
}

/// Metrics for a single glyph in the atlas
///
/// Missing numeric fields deserialize to zero, so a glyph is always usable
/// once the font description has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Glyph {
    /// Character code this glyph renders
    pub id: u32,
    /// Left edge of the glyph bitmap in the atlas
    pub x: f32,
    /// Top edge of the glyph bitmap in the atlas
    pub y: f32,
    /// Bitmap width
    pub width: f32,
    /// Bitmap height
    pub height: f32,
    /// Horizontal offset from the pen position to the bitmap
    pub x_offset: f32,
    /// Vertical offset from the line top to the bitmap
    pub y_offset: f32,
    /// Pen advance after drawing this glyph
    pub x_advance: f32,
}

impl Glyph {
    /// Create a glyph with the given bitmap size and advance
    pub fn new(ch: char, width: f32, height: f32, x_advance: f32) -> Self {
        Self {
            id: ch as u32,
            width,
            height,
            x_advance,
            ..Default::default()
        }
    }

    /// Set the bitmap origin offsets
    pub fn with_offset(mut self, x_offset: f32, y_offset: f32) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    /// Set the bitmap position inside the atlas
    pub fn with_atlas_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// Descriptive font information
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontInfo {
    /// Font face name
    pub face: String,
    /// Size the atlas was generated at
    pub size: f32,
    /// Characters the atlas was generated for, in declaration order
    pub charset: Vec<char>,
}

/// Font-wide constants shared by every glyph
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontCommon {
    /// Distance between consecutive baselines
    pub line_height: f32,
    /// Distance from the line top to the baseline
    pub base: f32,
}

/// A pre-parsed bitmap font
///
/// `chars` is optional: a description without a glyph table is accepted and
/// lays out to empty output rather than failing. Every deserialization path
/// goes through [`BitmapFont::normalized`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawBitmapFont")]
pub struct BitmapFont {
    /// Descriptive information, including the declared charset
    pub info: Option<FontInfo>,
    /// Font-wide constants
    pub common: FontCommon,
    /// Glyph table keyed by character
    pub chars: Option<HashMap<char, Glyph>>,
    /// Kerning adjustments keyed by `(left id, right id)`
    pub kernings: HashMap<(u32, u32), f32>,
}

/// Font description as written, before glyph ids are filled in
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawBitmapFont {
    info: Option<FontInfo>,
    common: FontCommon,
    chars: Option<HashMap<char, Glyph>>,
    kernings: HashMap<(u32, u32), f32>,
}

impl From<RawBitmapFont> for BitmapFont {
    fn from(raw: RawBitmapFont) -> Self {
        Self {
            info: raw.info,
            common: raw.common,
            chars: raw.chars,
            kernings: raw.kernings,
        }
        .normalized()
    }
}

impl Config for BitmapFont {}

impl BitmapFont {
    /// Create a font with the given constants and an empty glyph table
    pub fn new(line_height: f32, base: f32) -> Self {
        Self {
            info: None,
            common: FontCommon { line_height, base },
            chars: Some(HashMap::new()),
            kernings: HashMap::new(),
        }
    }

    /// Create a font with the given constants and no glyph table at all
    pub fn without_glyph_table(line_height: f32, base: f32) -> Self {
        Self {
            chars: None,
            ..Self::new(line_height, base)
        }
    }

    /// Parse a RON font description
    pub fn from_ron_str(source: &str) -> FontResult<Self> {
        ron::from_str(source).map_err(|e| FontError::Parse(e.to_string()))
    }

    /// Load a font description from a `.ron` file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let font = Self::load_from_file(path)?;
        log::debug!(
            "Loaded font description '{}': {} glyphs, {} kerning pairs",
            path,
            font.chars.as_ref().map_or(0, HashMap::len),
            font.kernings.len()
        );
        Ok(font)
    }

    /// Add a glyph for `ch`, filling in its id if it was left at zero
    pub fn with_glyph(mut self, ch: char, mut glyph: Glyph) -> Self {
        if glyph.id == 0 {
            glyph.id = ch as u32;
        }
        self.chars.get_or_insert_with(HashMap::new).insert(ch, glyph);
        self
    }

    /// Add a kerning adjustment between two characters
    pub fn with_kerning(mut self, left: char, right: char, amount: f32) -> Self {
        self.kernings.insert((left as u32, right as u32), amount);
        self
    }

    /// Set the declared charset
    pub fn with_charset(mut self, charset: impl IntoIterator<Item = char>) -> Self {
        self.info.get_or_insert_with(FontInfo::default).charset = charset.into_iter().collect();
        self
    }

    /// Fill glyph ids that were omitted from the description with their map key
    pub fn normalized(mut self) -> Self {
        if let Some(chars) = self.chars.as_mut() {
            for (ch, glyph) in chars.iter_mut() {
                if glyph.id == 0 {
                    glyph.id = *ch as u32;
                }
            }
        }
        self
    }

    /// Check that the font constants can drive a layout
    pub fn validate(&self) -> FontResult<()> {
        if !self.common.line_height.is_finite() {
            return Err(FontError::Invalid(format!(
                "line height is not finite: {}",
                self.common.line_height
            )));
        }
        if !self.common.base.is_finite() {
            return Err(FontError::Invalid(format!(
                "base is not finite: {}",
                self.common.base
            )));
        }
        Ok(())
    }

    /// Whether the description carries a glyph table
    pub fn has_glyph_table(&self) -> bool {
        self.chars.is_some()
    }

    /// Exact glyph lookup, without any fallback
    pub fn find_char(&self, ch: char) -> Option<&Glyph> {
        self.chars.as_ref()?.get(&ch)
    }

    /// Kerning adjustment between two glyph ids, zero when absent
    pub fn kerning(&self, left: u32, right: u32) -> f32 {
        self.kernings.get(&(left, right)).copied().unwrap_or(0.0)
    }

    /// Declared charset, empty when the description has no info block
    pub fn charset(&self) -> &[char] {
        self.info.as_ref().map_or(&[], |info| info.charset.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let font = BitmapFont::from_ron_str(
            r#"(
                common: (line_height: 32.0, base: 26.0),
                chars: Some({
                    'a': (width: 10.0, height: 12.0),
                }),
            )"#,
        )
        .unwrap();

        let glyph = font.find_char('a').unwrap();
        assert_eq!(glyph.id, 'a' as u32);
        assert_eq!(glyph.x_advance, 0.0);
        assert_eq!(glyph.x_offset, 0.0);
        assert_eq!(glyph.y_offset, 0.0);
        assert_eq!(glyph.width, 10.0);
    }

    #[test]
    fn test_description_without_glyph_table() {
        let font = BitmapFont::from_ron_str("(common: (line_height: 32.0, base: 26.0))").unwrap();

        assert!(!font.has_glyph_table());
        assert!(font.find_char('a').is_none());
        assert!(font.charset().is_empty());
    }

    #[test]
    fn test_kerning_lookup() {
        let font = BitmapFont::new(32.0, 26.0)
            .with_glyph('A', Glyph::new('A', 10.0, 20.0, 11.0))
            .with_glyph('V', Glyph::new('V', 10.0, 20.0, 11.0))
            .with_kerning('A', 'V', -2.0);

        assert_eq!(font.kerning('A' as u32, 'V' as u32), -2.0);
        assert_eq!(font.kerning('V' as u32, 'A' as u32), 0.0);
    }

    #[test]
    fn test_kerning_from_description() {
        let font = BitmapFont::from_ron_str(
            r#"(
                common: (line_height: 32.0, base: 26.0),
                kernings: { (65, 86): -3.0 },
            )"#,
        )
        .unwrap();

        assert_eq!(font.kerning(65, 86), -3.0);
    }

    #[test]
    fn test_validate_rejects_non_finite_constants() {
        assert!(BitmapFont::new(32.0, 26.0).validate().is_ok());
        assert!(matches!(
            BitmapFont::new(f32::NAN, 26.0).validate(),
            Err(FontError::Invalid(_))
        ));
        assert!(matches!(
            BitmapFont::new(32.0, f32::INFINITY).validate(),
            Err(FontError::Invalid(_))
        ));
    }

    #[test]
    fn test_demo_font_description_parses() {
        let font =
            BitmapFont::from_ron_str(include_str!("../../../../resources/fonts/demo_font.ron"))
                .unwrap();

        assert!(font.validate().is_ok());
        assert_eq!(font.common.line_height, 52.0);
        assert_eq!(font.find_char('x').unwrap().id, 'x' as u32);
        assert_eq!(font.find_char('\'').unwrap().id, '\'' as u32);
        assert_eq!(font.kerning('A' as u32, 'V' as u32), -3.0);
        assert_eq!(font.charset().first(), Some(&' '));
    }

    #[test]
    fn test_config_trait_fills_glyph_ids() {
        let source = r#"(
            common: (line_height: 32.0, base: 26.0),
            chars: Some({
                'A': (width: 10.0, height: 20.0, x_advance: 5.0),
                'V': (width: 10.0, height: 20.0, x_advance: 5.0),
            }),
            kernings: { (65, 86): -3.0 },
        )"#;
        let font = BitmapFont::from_str_with_format(source, "font.ron").unwrap();

        let left = font.find_char('A').unwrap().id;
        let right = font.find_char('V').unwrap().id;
        assert_eq!((left, right), (65, 86));
        assert_eq!(font.kerning(left, right), -3.0);
    }

    #[test]
    fn test_atlas_position_survives_round_trip() {
        let font = BitmapFont::new(32.0, 26.0)
            .with_glyph('a', Glyph::new('a', 10.0, 12.0, 11.0).with_atlas_position(64.0, 128.0));
        let source = ron::to_string(&font).unwrap();
        let reloaded = BitmapFont::from_ron_str(&source).unwrap();

        let glyph = reloaded.find_char('a').unwrap();
        assert_eq!((glyph.x, glyph.y), (64.0, 128.0));
        assert_eq!(glyph.id, 'a' as u32);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(BitmapFont::from_ron_str("(common: "), Err(FontError::Parse(_))));
    }
}
