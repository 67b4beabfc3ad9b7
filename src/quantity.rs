//! View-count and duration parsing.
//!
//! Both parsers are total: malformed input degrades to `0` so that one
//! garbage card never stops the rest of a batch.

use tracing::trace;

use crate::normalize::normalize;
use crate::patterns::{GROUPED_THOUSANDS, TIME_RUN, VIEW_NUMBER};

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;
const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Parses a view-count phrase into an integer.
///
/// Handles `K`/`M`/`B` multipliers, the Cyrillic `тыс`/`млн` abbreviations,
/// Indian `lakh`/`crore` notation, comma decimal separators (`1,2 тыс.`)
/// and thousands grouping (`45,231`, `12,34,567`, `45 231`). Digits grouped
/// with spaces are always one integer. The first number in the text wins;
/// text without digits yields `0`.
///
/// # Example
///
/// ```rust
/// use yt_card_filter::parse_view_count;
///
/// assert_eq!(parse_view_count("1.2K views"), 1_200);
/// assert_eq!(parse_view_count("3 lakh views"), 300_000);
/// assert_eq!(parse_view_count("no views yet"), 0);
/// ```
#[must_use]
pub fn parse_view_count(text: &str) -> u64 {
    let normalized = normalize(text);
    let Some(caps) = VIEW_NUMBER.captures(&normalized) else {
        return 0;
    };
    let Some(token) = caps.name("num").map(|m| m.as_str()) else {
        return 0;
    };
    let suffix = caps.name("suffix").map(|m| m.as_str());

    let value = if is_space_grouped(token) || (suffix.is_none() && GROUPED_THOUSANDS.is_match(token)) {
        grouped_integer(token)
    } else {
        leading_decimal(token)
    };
    let Some(value) = value else {
        return 0;
    };

    let count = round_to_count(value * suffix.map_or(1.0, multiplier));
    trace!(text, count, "parsed view count");
    count
}

/// Converts a clock stamp into seconds.
///
/// The first `digits(:digits)*` run is read as base-60 place values, most
/// significant first, so `"1:02:45"` is 3765. Oversized values saturate at
/// `u64::MAX`; text without digits yields `0`.
///
/// # Example
///
/// ```rust
/// use yt_card_filter::time_to_seconds;
///
/// assert_eq!(time_to_seconds("12:34"), 754);
/// assert_eq!(time_to_seconds("1:02:45"), 3765);
/// assert_eq!(time_to_seconds("abc"), 0);
/// ```
#[must_use]
pub fn time_to_seconds(text: &str) -> u64 {
    let normalized = normalize(text);
    let Some(run) = TIME_RUN.find(&normalized) else {
        return 0;
    };

    let seconds = run
        .as_str()
        .split(':')
        .map(|part| part.parse::<u64>().unwrap_or(u64::MAX))
        .fold(0u64, |acc, part| acc.saturating_mul(60).saturating_add(part));
    trace!(text, seconds, "parsed duration");
    seconds
}

fn multiplier(suffix: &str) -> f64 {
    match suffix {
        "crore" => CRORE,
        "lakh" | "lac" | "l" => LAKH,
        "billion" | "bn" | "b" => BILLION,
        "million" | "mn" | "m" | "млн" => MILLION,
        "thousand" | "тыс" | "k" => THOUSAND,
        _ => 1.0,
    }
}

/// `45 231`: U+00A0/U+202F grouping after normalization.
fn is_space_grouped(token: &str) -> bool {
    token.contains(' ')
}

fn grouped_integer(token: &str) -> Option<f64> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Reads `12`, `1.5` or `1,5` (comma as decimal separator); anything after a
/// second separator is ignored.
fn leading_decimal(token: &str) -> Option<f64> {
    let dotted = token.replace(',', ".");
    let mut parts = dotted.splitn(3, '.');
    let whole = parts.next()?;
    match parts.next() {
        Some(fraction) if !fraction.is_empty() => format!("{whole}.{fraction}").parse().ok(),
        _ => whole.parse().ok(),
    }
}

fn round_to_count(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    if value >= u64::MAX as f64 {
        return u64::MAX;
    }
    value.round() as u64
}
