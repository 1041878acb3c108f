//! Contextual shaping applied before RTL reordering
//!
//! Bitmap fonts store Arabic letters as presentation forms, one glyph per
//! positional form. [`ArabicShaper`] picks the isolated, final, initial or
//! medial form of each letter from its neighbours and folds lam-alef pairs
//! into their ligatures.

/// Converts logical text into the characters a bitmap font actually holds
pub trait Shaper: Send + Sync {
    /// Shape `text`, returning the substituted string
    fn shape(&self, text: &str) -> String;
}

/// Shaper that returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShaping;

impl Shaper for NoShaping {
    fn shape(&self, text: &str) -> String {
        text.to_string()
    }
}

/// How a character connects to its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoiningType {
    /// Connects on both sides
    Dual,
    /// Connects only to the preceding character
    Right,
    /// Forces neighbours to connect without changing shape itself (tatweel)
    Causing,
    /// Marks that are skipped when looking for neighbours
    Transparent,
    /// Does not connect
    NonJoining,
}

/// Positional form of a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterForm {
    /// Standalone
    Isolated,
    /// Connected to the preceding letter only
    Final,
    /// Connected to the following letter only
    Initial,
    /// Connected on both sides
    Medial,
}

const LAM: char = '\u{0644}';
const TATWEEL: char = '\u{0640}';

/// Presentation forms per letter: isolated, final, initial, medial.
/// Zero marks a form the letter does not have. Sorted by base codepoint.
const LETTER_FORMS: &[(u32, [u32; 4])] = &[
    (0x0621, [0xFE80, 0, 0, 0]),
    (0x0622, [0xFE81, 0xFE82, 0, 0]),
    (0x0623, [0xFE83, 0xFE84, 0, 0]),
    (0x0624, [0xFE85, 0xFE86, 0, 0]),
    (0x0625, [0xFE87, 0xFE88, 0, 0]),
    (0x0626, [0xFE89, 0xFE8A, 0xFE8B, 0xFE8C]),
    (0x0627, [0xFE8D, 0xFE8E, 0, 0]),
    (0x0628, [0xFE8F, 0xFE90, 0xFE91, 0xFE92]),
    (0x0629, [0xFE93, 0xFE94, 0, 0]),
    (0x062A, [0xFE95, 0xFE96, 0xFE97, 0xFE98]),
    (0x062B, [0xFE99, 0xFE9A, 0xFE9B, 0xFE9C]),
    (0x062C, [0xFE9D, 0xFE9E, 0xFE9F, 0xFEA0]),
    (0x062D, [0xFEA1, 0xFEA2, 0xFEA3, 0xFEA4]),
    (0x062E, [0xFEA5, 0xFEA6, 0xFEA7, 0xFEA8]),
    (0x062F, [0xFEA9, 0xFEAA, 0, 0]),
    (0x0630, [0xFEAB, 0xFEAC, 0, 0]),
    (0x0631, [0xFEAD, 0xFEAE, 0, 0]),
    (0x0632, [0xFEAF, 0xFEB0, 0, 0]),
    (0x0633, [0xFEB1, 0xFEB2, 0xFEB3, 0xFEB4]),
    (0x0634, [0xFEB5, 0xFEB6, 0xFEB7, 0xFEB8]),
    (0x0635, [0xFEB9, 0xFEBA, 0xFEBB, 0xFEBC]),
    (0x0636, [0xFEBD, 0xFEBE, 0xFEBF, 0xFEC0]),
    (0x0637, [0xFEC1, 0xFEC2, 0xFEC3, 0xFEC4]),
    (0x0638, [0xFEC5, 0xFEC6, 0xFEC7, 0xFEC8]),
    (0x0639, [0xFEC9, 0xFECA, 0xFECB, 0xFECC]),
    (0x063A, [0xFECD, 0xFECE, 0xFECF, 0xFED0]),
    (0x0641, [0xFED1, 0xFED2, 0xFED3, 0xFED4]),
    (0x0642, [0xFED5, 0xFED6, 0xFED7, 0xFED8]),
    (0x0643, [0xFED9, 0xFEDA, 0xFEDB, 0xFEDC]),
    (0x0644, [0xFEDD, 0xFEDE, 0xFEDF, 0xFEE0]),
    (0x0645, [0xFEE1, 0xFEE2, 0xFEE3, 0xFEE4]),
    (0x0646, [0xFEE5, 0xFEE6, 0xFEE7, 0xFEE8]),
    (0x0647, [0xFEE9, 0xFEEA, 0xFEEB, 0xFEEC]),
    (0x0648, [0xFEED, 0xFEEE, 0, 0]),
    (0x0649, [0xFEEF, 0xFEF0, 0, 0]),
    (0x064A, [0xFEF1, 0xFEF2, 0xFEF3, 0xFEF4]),
    // Persian
    (0x067E, [0xFB56, 0xFB57, 0xFB58, 0xFB59]),
    (0x0686, [0xFB7A, 0xFB7B, 0xFB7C, 0xFB7D]),
    (0x0698, [0xFB8A, 0xFB8B, 0, 0]),
    (0x06A9, [0xFB8E, 0xFB8F, 0xFB90, 0xFB91]),
    (0x06AF, [0xFB92, 0xFB93, 0xFB94, 0xFB95]),
    (0x06CC, [0xFBFC, 0xFBFD, 0xFBFE, 0xFBFF]),
];

/// Lam followed by an alef variant: isolated and final ligature
const LAM_ALEF: &[(u32, [u32; 2])] = &[
    (0x0622, [0xFEF5, 0xFEF6]),
    (0x0623, [0xFEF7, 0xFEF8]),
    (0x0625, [0xFEF9, 0xFEFA]),
    (0x0627, [0xFEFB, 0xFEFC]),
];

/// Joining type of `ch`
pub fn joining_type(ch: char) -> JoiningType {
    match ch as u32 {
        0x064B..=0x065F | 0x0670 => JoiningType::Transparent,
        0x0640 => JoiningType::Causing,
        0x0621 => JoiningType::NonJoining,
        _ => match letter_forms(ch) {
            Some([_, _, 0, _]) => JoiningType::Right,
            Some(_) => JoiningType::Dual,
            None => JoiningType::NonJoining,
        },
    }
}

fn letter_forms(ch: char) -> Option<[u32; 4]> {
    let cp = ch as u32;
    LETTER_FORMS
        .binary_search_by_key(&cp, |&(base, _)| base)
        .ok()
        .map(|index| LETTER_FORMS[index].1)
}

fn lam_alef(alef: char) -> Option<[u32; 2]> {
    let cp = alef as u32;
    LAM_ALEF
        .iter()
        .find(|&&(base, _)| base == cp)
        .map(|&(_, forms)| forms)
}

/// Form of `ch` for the given joining context
fn form_char(ch: char, form: LetterForm) -> char {
    let Some(forms) = letter_forms(ch) else {
        return ch;
    };
    let index = match form {
        LetterForm::Isolated => 0,
        LetterForm::Final => 1,
        LetterForm::Initial => 2,
        LetterForm::Medial => 3,
    };
    // Fall back towards the isolated form when a letter lacks the requested one
    [forms[index], forms[1], forms[0]]
        .into_iter()
        .find(|&cp| cp != 0)
        .and_then(char::from_u32)
        .unwrap_or(ch)
}

/// Nearest non-transparent character before `index`
fn previous_joining(chars: &[char], index: usize) -> Option<JoiningType> {
    chars[..index]
        .iter()
        .rev()
        .map(|&ch| joining_type(ch))
        .find(|&joining| joining != JoiningType::Transparent)
}

/// Index of the nearest non-transparent character after `index`
fn next_joining_index(chars: &[char], index: usize) -> Option<usize> {
    (index + 1..chars.len()).find(|&i| joining_type(chars[i]) != JoiningType::Transparent)
}

/// Arabic and Persian contextual shaper
#[derive(Debug, Clone, Copy, Default)]
pub struct ArabicShaper;

impl Shaper for ArabicShaper {
    fn shape(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut output = String::with_capacity(text.len());
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            let joining = joining_type(ch);
            if ch == TATWEEL || letter_forms(ch).is_none() {
                output.push(ch);
                i += 1;
                continue;
            }

            let joins_previous = joining != JoiningType::NonJoining
                && matches!(
                    previous_joining(&chars, i),
                    Some(JoiningType::Dual | JoiningType::Causing)
                );
            let next = next_joining_index(&chars, i);

            if ch == LAM {
                if let Some((alef_index, ligature)) =
                    next.and_then(|n| lam_alef(chars[n]).map(|forms| (n, forms)))
                {
                    let cp = if joins_previous { ligature[1] } else { ligature[0] };
                    output.push(char::from_u32(cp).unwrap_or(ch));
                    // Marks between lam and alef stay attached to the ligature
                    output.extend(&chars[i + 1..alef_index]);
                    i = alef_index + 1;
                    continue;
                }
            }

            let joins_next = joining == JoiningType::Dual
                && next.is_some_and(|n| {
                    matches!(
                        joining_type(chars[n]),
                        JoiningType::Dual | JoiningType::Right | JoiningType::Causing
                    )
                });

            let form = match (joins_previous, joins_next) {
                (true, true) => LetterForm::Medial,
                (true, false) => LetterForm::Final,
                (false, true) => LetterForm::Initial,
                (false, false) => LetterForm::Isolated,
            };
            output.push(form_char(ch, form));
            i += 1;
        }

        output
    }
}
