//! Glyph lookup with tab and space fallbacks
//!
//! Fonts often ship without a space or tab glyph. The lookup synthesizes
//! both from whatever the font does provide, once per layout pass, so the
//! font description itself stays untouched.

use super::font::{BitmapFont, Glyph};

/// Tab character
pub const TAB: char = '\t';

/// Space character
pub const SPACE: char = ' ';

/// Glyphs tried, in order, when the font has no space glyph
const M_WIDTHS: [char; 2] = ['m', 'w'];

/// Glyph lookup bound to one font and one tab size
#[derive(Debug, Clone)]
pub struct GlyphLookup<'a> {
    font: &'a BitmapFont,
    fallback_space: Option<Glyph>,
    fallback_tab: Option<Glyph>,
}

impl<'a> GlyphLookup<'a> {
    /// Prepare fallback glyphs for `font`
    ///
    /// The tab fallback advances `tab_size` times the space fallback.
    pub fn new(font: &'a BitmapFont, tab_size: f32) -> Self {
        let fallback_space = space_glyph(font);
        if fallback_space.is_none() && font.has_glyph_table() {
            log::warn!(
                "Font has no space, 'm', 'w' or charset glyph; spaces and tabs will be skipped"
            );
        }

        let fallback_tab = fallback_space.map(|space| Glyph {
            id: TAB as u32,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            x_offset: 0.0,
            y_offset: 0.0,
            x_advance: tab_size * space.x_advance,
        });

        Self {
            font,
            fallback_space,
            fallback_tab,
        }
    }

    /// Font this lookup reads from
    pub fn font(&self) -> &'a BitmapFont {
        self.font
    }

    /// Look up the glyph for `ch`, falling back for tab and space
    ///
    /// Any other character missing from the font yields `None`.
    pub fn get_glyph(&self, ch: char) -> Option<Glyph> {
        if let Some(glyph) = self.font.find_char(ch) {
            return Some(*glyph);
        }
        match ch {
            TAB => self.fallback_tab,
            SPACE => self.fallback_space,
            _ => None,
        }
    }

    /// Glyph used for spaces when the font has none
    pub fn fallback_space(&self) -> Option<Glyph> {
        self.fallback_space
    }

    /// Glyph used for tabs when the font has none
    pub fn fallback_tab(&self) -> Option<Glyph> {
        self.fallback_tab
    }
}

/// Space glyph, then 'm' or 'w', then the first charset entry with a glyph
fn space_glyph(font: &BitmapFont) -> Option<Glyph> {
    if !font.has_glyph_table() {
        return None;
    }

    std::iter::once(SPACE)
        .chain(M_WIDTHS)
        .chain(font.charset().iter().copied())
        .find_map(|ch| font.find_char(ch))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_with(chars: &[(char, f32)]) -> BitmapFont {
        chars.iter().fold(BitmapFont::new(40.0, 32.0), |font, &(ch, advance)| {
            font.with_glyph(ch, Glyph::new(ch, advance - 1.0, 20.0, advance))
        })
    }

    #[test]
    fn test_exact_lookup_wins() {
        let font = font_with(&[(' ', 5.0), ('\t', 30.0)]);
        let lookup = GlyphLookup::new(&font, 4.0);

        assert_eq!(lookup.get_glyph('\t').unwrap().x_advance, 30.0);
        assert_eq!(lookup.get_glyph(' ').unwrap().x_advance, 5.0);
    }

    #[test]
    fn test_tab_synthesized_from_space() {
        let font = font_with(&[(' ', 5.0)]);
        let lookup = GlyphLookup::new(&font, 4.0);

        let tab = lookup.get_glyph('\t').unwrap();
        assert_eq!(tab.id, '\t' as u32);
        assert_eq!(tab.x_advance, 20.0);
        assert_eq!(tab.width, 0.0);
        assert_eq!(tab.height, 0.0);
    }

    #[test]
    fn test_space_falls_back_to_m_then_w() {
        let font = font_with(&[('w', 9.0), ('m', 11.0)]);
        let lookup = GlyphLookup::new(&font, 4.0);
        assert_eq!(lookup.get_glyph(' ').unwrap().x_advance, 11.0);

        let font = font_with(&[('w', 9.0)]);
        let lookup = GlyphLookup::new(&font, 2.0);
        assert_eq!(lookup.get_glyph(' ').unwrap().x_advance, 9.0);
        assert_eq!(lookup.get_glyph('\t').unwrap().x_advance, 18.0);
    }

    #[test]
    fn test_space_falls_back_to_charset() {
        let font = font_with(&[('b', 7.0), ('a', 6.0)]).with_charset(['q', 'b', 'a']);
        let lookup = GlyphLookup::new(&font, 4.0);

        assert_eq!(lookup.get_glyph(' ').unwrap().x_advance, 7.0);
    }

    #[test]
    fn test_missing_character_is_none() {
        let font = font_with(&[('a', 6.0)]);
        let lookup = GlyphLookup::new(&font, 4.0);

        assert!(lookup.get_glyph('z').is_none());
        assert!(lookup.fallback_space().is_none());
        assert!(lookup.get_glyph(' ').is_none());
    }

    #[test]
    fn test_font_without_glyph_table() {
        let font = BitmapFont::without_glyph_table(40.0, 32.0).with_charset(['a']);
        let lookup = GlyphLookup::new(&font, 4.0);

        assert!(lookup.get_glyph('a').is_none());
        assert!(lookup.fallback_tab().is_none());
    }
}
