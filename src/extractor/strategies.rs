//! Views/duration extraction strategies.
//!
//! Card markup differs between layouts and locales, so extraction runs an
//! ordered list of strategies from the most structured hook to brute-force
//! text scanning. Each strategy reports whatever it finds; the runner keeps
//! the first hit per field.

use dom_query::Selection;
use tracing::trace;

use crate::dom;
use crate::patterns::{DURATION_BADGE_SELECTOR, DURATION_TEXT, METADATA_ROW_SELECTOR, VIEWS_TEXT};

/// Upper bound on metadata-row elements inspected per card.
pub const MAX_METADATA_ROWS: usize = 64;

/// Raw fragments found by one strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldHits {
    /// View-count phrase, e.g. `"1.2K views"`.
    pub views_text: Option<String>,
    /// Clock stamp, e.g. `"12:34"`.
    pub duration_text: Option<String>,
}

impl FieldHits {
    /// Both fields found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.views_text.is_some() && self.duration_text.is_some()
    }

    /// Fill the fields still missing from `other`.
    pub fn merge(&mut self, other: FieldHits) {
        if self.views_text.is_none() {
            self.views_text = other.views_text;
        }
        if self.duration_text.is_none() {
            self.duration_text = other.duration_text;
        }
    }
}

/// A strategy inspects a card and reports what it found.
pub type Strategy = fn(&Selection) -> FieldHits;

/// Strategies in the order they are tried.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("duration_badge", duration_badge),
    ("metadata_rows", metadata_rows),
    ("text_lines", text_lines),
];

/// Run `STRATEGIES` in order, first success per field, stopping early once
/// both fields are known.
#[must_use]
pub fn run(card: &Selection) -> FieldHits {
    let mut hits = FieldHits::default();
    for (name, strategy) in STRATEGIES {
        let found = strategy(card);
        if found != FieldHits::default() {
            trace!(strategy = name, ?found, "strategy hit");
        }
        hits.merge(found);
        if hits.is_complete() {
            break;
        }
    }
    hits
}

/// Thumbnail duration badge, accepted only if it holds a clock stamp.
#[must_use]
pub fn duration_badge(card: &Selection) -> FieldHits {
    let badge = dom::query_selector(card, DURATION_BADGE_SELECTOR);
    if !badge.exists() {
        return FieldHits::default();
    }
    let text = dom::text_content(&badge);
    FieldHits {
        views_text: None,
        duration_text: find_duration(text.trim()),
    }
}

/// Metadata-row spans; views and duration each take their first hit.
#[must_use]
pub fn metadata_rows(card: &Selection) -> FieldHits {
    let rows = dom::query_selector_all(card, METADATA_ROW_SELECTOR);
    let mut hits = FieldHits::default();

    for row in dom::split(&rows).into_iter().take(MAX_METADATA_ROWS) {
        let text = dom::text_content(&row);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if hits.views_text.is_none() {
            hits.views_text = find_views(text);
        }
        if hits.duration_text.is_none() {
            hits.duration_text = find_duration(text);
        }
        if hits.is_complete() {
            break;
        }
    }
    hits
}

/// Brute-force scan over the card's visible text, line by line.
#[must_use]
pub fn text_lines(card: &Selection) -> FieldHits {
    scan_lines(&dom::visible_lines(card))
}

/// Line-by-line views/duration scan, first match per field.
#[must_use]
pub fn scan_lines(lines: &[String]) -> FieldHits {
    FieldHits {
        views_text: lines.iter().find_map(|line| find_views(line)),
        duration_text: lines.iter().find_map(|line| find_duration(line)),
    }
}

fn find_views(text: &str) -> Option<String> {
    VIEWS_TEXT.find(text).map(|m| m.as_str().to_string())
}

fn find_duration(text: &str) -> Option<String> {
    DURATION_TEXT.find(text).map(|m| m.as_str().to_string())
}
