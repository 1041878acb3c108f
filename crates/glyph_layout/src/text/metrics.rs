//! Typographic metrics derived from a font and a finished line count

use serde::{Deserialize, Serialize};

use super::font::BitmapFont;

/// Characters probed, in order, for the x-height
pub const X_HEIGHTS: [char; 13] = ['x', 'e', 'a', 'o', 'n', 's', 'r', 'c', 'u', 'm', 'v', 'w', 'z'];

/// Characters probed, in order, for the cap height
pub const CAP_HEIGHTS: [char; 14] = [
    'H', 'I', 'N', 'E', 'F', 'K', 'L', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Width used to cap the layout when no width is configured
pub const DEFAULT_MAX_WIDTH: f32 = 560.0;

/// Metrics for one layout result
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Widest line, capped at the configured width
    pub width: f32,
    /// `line_height * line_count - descender`
    pub height: f32,
    /// Distance between consecutive baselines
    pub line_height: f32,
    /// Distance from the line top to the baseline
    pub baseline: f32,
    /// `line_height - descender - x_height`
    pub ascender: f32,
    /// `line_height - baseline`
    pub descender: f32,
    /// Height of the first x-height probe glyph found
    pub x_height: f32,
    /// Height of the first cap-height probe glyph found
    pub cap_height: f32,
    /// Number of lines laid out
    pub line_count: usize,
}

impl LayoutMetrics {
    /// Derive the metrics for `line_count` lines
    ///
    /// `max_line_width` is the widest measured line; it is capped at
    /// `max_width`, or [`DEFAULT_MAX_WIDTH`] when none is set.
    pub fn derive(
        font: &BitmapFont,
        line_height: Option<f32>,
        line_count: usize,
        max_line_width: f32,
        max_width: Option<f32>,
    ) -> Self {
        let line_height = line_height.unwrap_or(font.common.line_height);
        let baseline = font.common.base;
        let descender = line_height - baseline;
        let x_height = x_height(font);
        let cap = max_width.filter(|width| *width != 0.0).unwrap_or(DEFAULT_MAX_WIDTH);

        Self {
            width: max_line_width.min(cap),
            height: line_height * line_count as f32 - descender,
            line_height,
            baseline,
            ascender: line_height - descender - x_height,
            descender,
            x_height,
            cap_height: cap_height(font),
            line_count,
        }
    }
}

/// Height of the first probe glyph present in the font, zero if none
fn probe_height(font: &BitmapFont, probes: &[char]) -> f32 {
    probes
        .iter()
        .find_map(|&ch| font.find_char(ch))
        .map_or(0.0, |glyph| glyph.height)
}

/// Height of a lowercase letter without ascenders
pub fn x_height(font: &BitmapFont) -> f32 {
    probe_height(font, &X_HEIGHTS)
}

/// Height of a flat-topped capital letter
pub fn cap_height(font: &BitmapFont) -> f32 {
    probe_height(font, &CAP_HEIGHTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::font::Glyph;
    use approx::assert_relative_eq;

    #[test]
    fn test_probe_priority() {
        let font = BitmapFont::new(40.0, 32.0)
            .with_glyph('z', Glyph::new('z', 10.0, 15.0, 11.0))
            .with_glyph('e', Glyph::new('e', 10.0, 16.0, 11.0))
            .with_glyph('Z', Glyph::new('Z', 10.0, 25.0, 11.0))
            .with_glyph('I', Glyph::new('I', 4.0, 26.0, 5.0));

        assert_eq!(x_height(&font), 16.0);
        assert_eq!(cap_height(&font), 26.0);
    }

    #[test]
    fn test_missing_probes_are_zero() {
        let font = BitmapFont::new(40.0, 32.0);
        assert_eq!(x_height(&font), 0.0);
        assert_eq!(cap_height(&font), 0.0);

        let font = BitmapFont::without_glyph_table(40.0, 32.0);
        assert_eq!(x_height(&font), 0.0);
    }

    #[test]
    fn test_derived_values() {
        let font = BitmapFont::new(40.0, 32.0).with_glyph('x', Glyph::new('x', 10.0, 18.0, 11.0));
        let metrics = LayoutMetrics::derive(&font, None, 3, 120.0, None);

        assert_relative_eq!(metrics.line_height, 40.0);
        assert_relative_eq!(metrics.descender, 8.0);
        assert_relative_eq!(metrics.height, 40.0 * 3.0 - 8.0);
        assert_relative_eq!(metrics.ascender, 40.0 - 8.0 - 18.0);
        assert_relative_eq!(metrics.width, 120.0);
        assert_eq!(metrics.line_count, 3);
    }

    #[test]
    fn test_line_height_override() {
        let font = BitmapFont::new(40.0, 32.0);
        let metrics = LayoutMetrics::derive(&font, Some(50.0), 2, 0.0, None);

        assert_relative_eq!(metrics.descender, 18.0);
        assert_relative_eq!(metrics.height, 100.0 - 18.0);
    }

    #[test]
    fn test_width_is_capped() {
        let font = BitmapFont::new(40.0, 32.0);

        let width = |max_line_width, max_width| {
            LayoutMetrics::derive(&font, None, 1, max_line_width, max_width).width
        };

        assert_relative_eq!(width(900.0, None), DEFAULT_MAX_WIDTH);
        assert_relative_eq!(width(900.0, Some(300.0)), 300.0);
        assert_relative_eq!(width(200.0, Some(300.0)), 200.0);
    }
}
