//! # yt-card-filter
//!
//! Extraction-and-decision core of a content filter for video listing pages.
//!
//! The library reads rendered video cards, pulls view-count and duration
//! text out of noisy, localized markup, turns it into numbers and removes
//! cards that fall below configurable thresholds, with channel allow/deny
//! lists taking precedence.
//!
//! ## Quick Start
//!
//! ```rust
//! use yt_card_filter::{filter_html, Config};
//!
//! let html = r#"<div id="grid">
//!   <ytd-video-renderer><span role="text">850 views</span><span role="text">3:12</span></ytd-video-renderer>
//!   <ytd-video-renderer><span role="text">1.2M views</span><span role="text">18:40</span></ytd-video-renderer>
//! </div>"#;
//!
//! let outcome = filter_html(html, &Config::default())?;
//! assert_eq!(outcome.removals.len(), 1);
//! assert_eq!(outcome.evaluated, 2);
//! # Ok::<(), yt_card_filter::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Quantity parsing**: `1.2K`, `5M`, `2 crore`, `3 lakh`, `1,5 тыс.`, Arabic-Indic digits
//! - **Layered extraction**: duration badge, metadata rows, then raw text lines
//! - **Policy**: AND/OR thresholds, shorts and live rules, whitelist over blacklist
//! - **Reaction loop**: debounced, chunked, idempotent processing of inserted cards

mod error;

/// Compiled regexes and CSS selectors.
pub mod patterns;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Locale cleanup of raw card text.
pub mod normalize;

/// View-count and duration parsing.
pub mod quantity;

/// Card metadata extraction (views, duration, live, shorts, channel).
pub mod extractor;

/// Filter configuration.
pub mod config;

/// Configuration ownership, persistence and list editing.
pub mod settings;

/// Keep/remove decisions.
pub mod policy;

/// Removal tallies.
pub mod stats;

/// Removal collaborators.
pub mod removal;

/// Debounced, chunked scheduling.
pub mod scheduler;

/// Mutation reaction loop.
pub mod reactor;

use std::time::Instant;

use serde::Serialize;
use tracing::debug;

// Public API - re-exports
pub use config::{Config, FilterMode};
pub use error::{Error, Result};
pub use extractor::{parse_card, ChannelInfo, ParsedVideoData};
pub use normalize::normalize;
pub use policy::{evaluate_card, should_remove, FilterDecision, KeepReason, RemovalReason};
pub use quantity::{parse_view_count, time_to_seconds};
pub use reactor::Reactor;
pub use removal::{DomRemover, NoopSink, RecordingSink, Removal, RemovalSink};
pub use settings::{ConfigStore, MemoryStore, Settings};
pub use stats::FilterStats;

/// Result of a one-shot filtering pass over a document.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOutcome {
    /// Serialized document after removals.
    pub html: String,
    /// Cards removed, in processing order.
    pub removals: Vec<Removal>,
    /// Cards evaluated.
    pub evaluated: usize,
    pub stats: FilterStats,
}

/// JSON report printed by the `filter_stdin` binary.
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub evaluated: usize,
    /// Number of entries in `removals`.
    pub removed: usize,
    pub removals: Vec<Removal>,
    pub stats: FilterStats,
    pub html: String,
}

impl From<FilterOutcome> for FilterReport {
    fn from(outcome: FilterOutcome) -> Self {
        Self {
            evaluated: outcome.evaluated,
            removed: outcome.removals.len(),
            removals: outcome.removals,
            stats: outcome.stats,
            html: outcome.html,
        }
    }
}

/// Filters every card in an HTML document.
///
/// Runs the reaction loop to completion over a freshly parsed document and
/// detaches the container of each removed card.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] for blank input and
/// [`Error::InvalidConfig`] when `config` fails validation.
///
/// # Example
///
/// ```rust
/// use yt_card_filter::{filter_html, Config, FilterMode};
///
/// let config = Config {
///     filter_mode: FilterMode::And,
///     ..Config::default()
/// };
/// let html = r#"<ytd-video-renderer><span role="text">10:00</span></ytd-video-renderer>"#;
/// let outcome = filter_html(html, &config)?;
/// assert!(outcome.removals.is_empty());
/// # Ok::<(), yt_card_filter::Error>(())
/// ```
pub fn filter_html(html: &str, config: &Config) -> Result<FilterOutcome> {
    if html.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    config.validate()?;

    let doc = dom::parse(html);
    let settings = Settings::with_config(config.clone(), Box::new(MemoryStore::new()));
    let mut reactor = Reactor::new(dom::root(&doc), settings, DomRemover::new());

    let now = Instant::now();
    reactor.start(now);
    let mut evaluated = 0;
    while reactor.next_wake(now).is_some() {
        evaluated += reactor.tick(now);
    }

    let (remover, stats) = reactor.finish();
    let removals = remover.into_removed();
    debug!(evaluated, removed = removals.len(), "document filtered");

    Ok(FilterOutcome {
        html: doc.html().to_string(),
        removals,
        evaluated,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_rejected() {
        assert!(matches!(
            filter_html("  \n ", &Config::default()),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            max_batch_size: 0,
            ..Config::default()
        };
        assert!(matches!(
            filter_html("<div></div>", &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_removed_cards_leave_the_html() {
        let html = r#"<div id="grid"><ytd-video-renderer id="a"><span role="text">99 views</span></ytd-video-renderer><ytd-video-renderer id="b"><span role="text">9M views</span></ytd-video-renderer></div>"#;
        let outcome = filter_html(html, &Config::default()).unwrap();
        assert!(!outcome.html.contains("id=\"a\""));
        assert!(outcome.html.contains("id=\"b\""));
        assert_eq!(outcome.stats.lifetime_total, 1);
    }
}
