//! Line sanitizing for the classifier's line protocol
//!
//! The classifier reads exactly one line per request, so every character
//! that could end a line early or confuse its tokenizer is removed first.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Characters replaced by a single space before control stripping
const SPACE_LIKE: [char; 5] = ['\r', '\n', '\t', '\u{2028}', '\u{2029}'];

/// Make a raw input line safe to send to the classifier.
///
/// Line terminators, tabs, and the Unicode line/paragraph separators become a
/// space; every other character in the `C*` general categories is dropped.
/// Offsets are never derived from the sanitized text.
pub fn sanitize_line(line: &str) -> String {
    line.chars()
        .map(|ch| if SPACE_LIKE.contains(&ch) { ' ' } else { ch })
        .filter(|&ch| !is_other_category(ch))
        .collect()
}

fn is_other_category(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}
