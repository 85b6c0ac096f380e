//! Validity Date Validation - Typed-time and blur-time rules.
//!
//! Two moments matter for the date field:
//!
//! - **While typing**: once exactly two digits are present and the user
//!   appends another character, the separator is inserted after the
//!   second digit first ("11" + '2' becomes "11/2").
//! - **On defocus**: the field must hold a full `MM<sep>YY` value with a
//!   syntactically valid month, or it is cleared entirely. States with
//!   fewer than four digits are "incomplete, not yet validated" during
//!   typing; only blur applies the hard rule. Clearing keeps the model
//!   valid-or-empty instead of carrying partial garbage across blur.

/// Apply the typed-time auto-separator to a candidate edit.
///
/// `current` is the display text before the edit, `candidate` the text
/// the surface wants to replace it with. The separator is inserted only
/// when the edit appends to exactly two raw digits; deletions and
/// already-separated text pass through untouched.
pub fn auto_separator(current: &str, candidate: &str, sep: char) -> String {
    let current_digits = current.chars().filter(|&ch| ch != sep).count();
    let growing = candidate.chars().count() > current.chars().count();
    if current_digits == 2 && growing && !candidate.contains(sep) {
        let mut out: String = candidate.chars().take(2).collect();
        out.push(sep);
        out.extend(candidate.chars().skip(2));
        return out;
    }
    candidate.to_string()
}

/// Separator-joined display form of a raw digit value: the separator is
/// inserted after the month once more than two digits are present.
pub fn joined(raw: &str, sep: char) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= 2 {
        return raw.to_string();
    }
    let mut out: String = chars[..2].iter().collect();
    out.push(sep);
    out.extend(&chars[2..]);
    out
}

/// Blur-time validation of the raw digit value.
///
/// Valid means a complete `MMYY`: exactly four digits with a month in
/// 01-12. Anything shorter than three characters, or that fails to
/// parse, is invalid and gets the field cleared by the caller.
pub fn is_valid_on_blur(raw: &str) -> bool {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() != 4 || !chars.iter().all(|ch| ch.is_ascii_digit()) {
        return false;
    }
    let month = (chars[0] as u32 - '0' as u32) * 10 + (chars[1] as u32 - '0' as u32);
    (1..=12).contains(&month)
}

// =============================================================================
// Tests
// =============================================================================
