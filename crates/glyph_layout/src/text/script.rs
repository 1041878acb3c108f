//! Right-to-left script detection and display reordering
//!
//! This is a range-based heuristic for Arabic-script text, not the Unicode
//! bidirectional algorithm. Runs of RTL characters are reversed in place so a
//! left-to-right pen produces them in visual order.

/// Inclusive codepoint ranges treated as right-to-left
pub const RTL_RANGES: &[(u32, u32)] = &[
    (0x0600, 0x06FF),   // Arabic
    (0x0750, 0x077F),   // Arabic Supplement
    (0x08A0, 0x08FF),   // Arabic Extended-A
    (0xFB50, 0xFDFF),   // Arabic Presentation Forms-A
    (0xFE70, 0xFEFF),   // Arabic Presentation Forms-B
    (0x10E60, 0x10E7F), // Rumi Numeral Symbols
    (0x1EC70, 0x1ECBF), // Indic Siyaq Numbers
    (0x1ED00, 0x1ED4F), // Ottoman Siyaq Numbers
    (0x1EE00, 0x1EEFF), // Arabic Mathematical Alphabetic Symbols
];

/// Whether `ch` falls in one of the RTL ranges
pub fn is_rtl_char(ch: char) -> bool {
    let cp = ch as u32;
    RTL_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
}

/// Whether any character of `text` is right-to-left
pub fn contains_rtl(text: &str) -> bool {
    text.chars().any(is_rtl_char)
}

/// Reverse each run of RTL characters, leaving everything else in order
///
/// A plain space joins the current run only when the very next character is
/// RTL. Two or more spaces between RTL characters therefore split the run.
pub fn reorder_for_display(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());
    let mut run: Vec<char> = Vec::new();

    for (i, &ch) in chars.iter().enumerate() {
        if is_rtl_char(ch) {
            run.push(ch);
        } else if ch == ' '
            && !run.is_empty()
            && chars.get(i + 1).is_some_and(|&next| is_rtl_char(next))
        {
            run.push(ch);
        } else {
            flush_run(&mut run, &mut output);
            output.push(ch);
        }
    }
    flush_run(&mut run, &mut output);

    output
}

fn flush_run(run: &mut Vec<char>, output: &mut String) {
    output.extend(run.drain(..).rev());
}
