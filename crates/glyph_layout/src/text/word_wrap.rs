//! Word wrapping over a pluggable measurement function
//!
//! A greedy wrapper in the style of libGDX's `BitmapFontCache`: each line is
//! measured to find how many characters fit, then pulled back to the last
//! whitespace. Tokens wider than the line are hard broken.

use serde::{Deserialize, Serialize};

const NEWLINE: char = '\n';

/// A run of characters assigned to one line
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineSpan {
    /// First character index (inclusive)
    pub start: usize,
    /// Last character index (exclusive)
    pub end: usize,
    /// Measured width of the span
    pub width: f32,
}

impl LineSpan {
    /// Number of characters in the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span holds no characters
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How lines are broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    /// Break at whitespace to fit the width, hard breaking long tokens
    #[default]
    Normal,
    /// Keep whitespace and break only at newlines
    Pre,
    /// Break only at newlines, measuring against an unbounded width
    NoWrap,
}

/// Parameters for one wrapping pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WrapOptions {
    /// Line width; `None` is unbounded
    pub width: Option<f32>,
    /// First character to wrap
    pub start: usize,
    /// End of the wrapped range; `None` is the end of the text
    pub end: Option<usize>,
    /// Line breaking mode
    pub mode: WrapMode,
}

/// Split `text` into line spans using `measure`
///
/// `measure(text, start, end, width)` must return the span of characters
/// from `start` that fit within `width`, and its width.
pub fn lines<F>(text: &[char], options: &WrapOptions, mut measure: F) -> Vec<LineSpan>
where
    F: FnMut(&[char], usize, usize, f32) -> LineSpan,
{
    // Zero width results in nothing visible
    if options.width == Some(0.0) && options.mode != WrapMode::NoWrap {
        return Vec::new();
    }

    let width = options.width.unwrap_or(f32::MAX);
    let end = options.end.unwrap_or(text.len()).min(text.len());
    let start = options.start;

    match options.mode {
        WrapMode::Pre => pre(&mut measure, text, start, end, width),
        WrapMode::Normal | WrapMode::NoWrap => {
            greedy(&mut measure, text, start, end, width, options.mode)
        }
    }
}

/// Measurement where every character is one unit wide
pub fn monospace(_text: &[char], start: usize, end: usize, width: f32) -> LineSpan {
    let available = end.saturating_sub(start);
    // Truncation is intended: a partial unit does not fit a character
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let fits = if width >= available as f32 { available } else { width.max(0.0) as usize };
    LineSpan {
        start,
        end: start + fits,
        width: fits as f32,
    }
}

fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

/// Index of the next newline at or after `start`, or `end` when there is none
fn newline_index(text: &[char], start: usize, end: usize) -> usize {
    text[start..end]
        .iter()
        .position(|&ch| ch == NEWLINE)
        .map_or(end, |offset| start + offset)
}

fn pre<F>(measure: &mut F, text: &[char], start: usize, end: usize, width: f32) -> Vec<LineSpan>
where
    F: FnMut(&[char], usize, usize, f32) -> LineSpan,
{
    let mut lines = Vec::new();
    let mut line_start = start;

    for i in start..end {
        let is_newline = text[i] == NEWLINE;
        if is_newline || i + 1 == end {
            let line_end = if is_newline { i } else { i + 1 };
            lines.push(measure(text, line_start, line_end, width));
            line_start = i + 1;
        }
    }

    lines
}

fn greedy<F>(
    measure: &mut F,
    text: &[char],
    mut start: usize,
    end: usize,
    width: f32,
    mode: WrapMode,
) -> Vec<LineSpan>
where
    F: FnMut(&[char], usize, usize, f32) -> LineSpan,
{
    let mut lines = Vec::new();

    // 'nowrap' only breaks on newline characters
    let test_width = if mode == WrapMode::NoWrap { f32::MAX } else { width };

    while start < end {
        let new_line = newline_index(text, start, end);

        // Eat whitespace at the start of the line
        while start < new_line && is_whitespace(text[start]) {
            start += 1;
        }

        // Visible glyphs for the available width
        let measured = measure(text, start, new_line, test_width);
        let mut line_end = start + measured.len();
        let mut next_start = line_end + 1;

        // The line was cut before the next newline: find a break point
        if line_end < new_line {
            while line_end > start && !is_whitespace(text[line_end]) {
                line_end -= 1;
            }

            if line_end == start {
                // No whitespace to break on, hard break the token
                if next_start > start + 1 {
                    next_start -= 1;
                }
                line_end = next_start;
            } else {
                next_start = line_end;
                // Eat whitespace at the end of the line
                while line_end > start && is_whitespace(text[line_end - 1]) {
                    line_end -= 1;
                }
            }
        }

        lines.push(measure(text, start, line_end, test_width));
        start = next_start;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn wrap(text: &str, width: Option<f32>, mode: WrapMode) -> Vec<String> {
        let text = chars(text);
        let options = WrapOptions { width, mode, ..Default::default() };
        lines(&text, &options, monospace)
            .iter()
            .map(|line| text[line.start..line.end].iter().collect())
            .collect()
    }

    #[test]
    fn test_unbounded_width_keeps_one_line() {
        assert_eq!(
            wrap("the quick brown fox", None, WrapMode::Normal),
            vec!["the quick brown fox"]
        );
    }

    #[test]
    fn test_breaks_at_whitespace() {
        assert_eq!(
            wrap("the quick brown fox", Some(10.0), WrapMode::Normal),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_hard_breaks_long_token() {
        assert_eq!(
            wrap("abcdefghij", Some(4.0), WrapMode::Normal),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn test_newline_consumes_an_index() {
        let text = chars("hx\nab");
        let spans = lines(&text, &WrapOptions::default(), monospace);

        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (0, 2));
        assert_eq!((spans[1].start, spans[1].end), (3, 5));
    }

    #[test]
    fn test_leading_whitespace_is_skipped() {
        assert_eq!(wrap("   abc", None, WrapMode::Normal), vec!["abc"]);
    }

    #[test]
    fn test_pre_keeps_whitespace() {
        assert_eq!(
            wrap("  ab  \ncd", Some(3.0), WrapMode::Pre),
            vec!["  a", "cd"]
        );
    }

    #[test]
    fn test_nowrap_breaks_only_on_newline() {
        assert_eq!(
            wrap("the quick brown\nfox", Some(4.0), WrapMode::NoWrap),
            vec!["the quick brown", "fox"]
        );
    }

    #[test]
    fn test_zero_width_is_empty() {
        assert!(wrap("abc", Some(0.0), WrapMode::Normal).is_empty());
        assert!(wrap("abc", Some(0.0), WrapMode::Pre).is_empty());
        assert_eq!(wrap("abc", Some(0.0), WrapMode::NoWrap), vec!["abc"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(wrap("", None, WrapMode::Normal).is_empty());
        assert!(wrap("", None, WrapMode::Pre).is_empty());
    }

    #[test]
    fn test_start_and_end_restrict_range() {
        let text = chars("one two three");
        let options = WrapOptions { start: 4, end: Some(7), ..Default::default() };
        let spans = lines(&text, &options, monospace);

        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (4, 7));
    }

    #[test]
    fn test_end_past_text_is_clamped() {
        let text = chars("abc");
        let options = WrapOptions { end: Some(10), mode: WrapMode::Pre, ..Default::default() };
        let spans = lines(&text, &options, monospace);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, 3);
    }
}
