//! Locale cleanup for raw card text.

/// Arabic thousands separator (U+066C).
const ARABIC_THOUSANDS_SEPARATOR: char = '\u{066C}';

/// Arabic-Indic digit glyphs, indexed by their ASCII value.
const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Normalizes raw card text for quantity parsing.
///
/// Non-breaking spaces become regular spaces, Arabic thousands separators
/// are dropped, Arabic-Indic digits are mapped to ASCII, and the result is
/// lowercased and trimmed. Text without any of these artifacts passes
/// through lowercased.
///
/// # Example
///
/// ```rust
/// use yt_card_filter::normalize;
///
/// assert_eq!(normalize("١٢٬٣٤٥\u{a0}Views"), "12345 views");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .filter(|c| *c != ARABIC_THOUSANDS_SEPARATOR)
        .map(|c| match c {
            '\u{00A0}' | '\u{202F}' => ' ',
            _ => arabic_digit(c).unwrap_or(c),
        })
        .collect();

    mapped.trim().to_lowercase()
}

fn arabic_digit(c: char) -> Option<char> {
    let index = ARABIC_INDIC_DIGITS.iter().position(|d| *d == c)?;
    char::from_digit(u32::try_from(index).ok()?, 10)
}
