//! Keep/remove decisions.
//!
//! The policy is a pure function of the parsed card data and the
//! configuration. Steps short-circuit in a fixed order: whitelist,
//! blacklist, blanket shorts/live rules, live skipping, missing data, and
//! finally the views/duration thresholds combined per `FilterMode`.

use std::fmt;

use dom_query::Selection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, FilterMode};
use crate::extractor::{self, ChannelInfo, ParsedVideoData};

/// Why a card was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalReason {
    /// View count under `min_views`.
    Views,
    /// Duration under `min_duration_seconds`.
    Duration,
    /// Blanket live-stream rule.
    Live,
    /// Blanket shorts rule.
    Short,
    /// Channel on the blacklist.
    Blacklist,
    /// Removed without a threshold flag to blame.
    Other,
}

impl RemovalReason {
    /// Lowercase name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Duration => "duration",
            Self::Live => "live",
            Self::Short => "short",
            Self::Blacklist => "blacklist",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a card was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    /// Channel on the whitelist.
    Whitelisted,
    /// Live stream with `skip_live_streams` set.
    LiveSkipped,
    /// Neither views nor duration text was found.
    InsufficientData,
    /// Thresholds satisfied.
    Passed,
}

/// Outcome of evaluating one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "lowercase")]
pub enum FilterDecision {
    /// Leave the card on the page.
    Keep(KeepReason),
    /// Remove the card.
    Remove(RemovalReason),
}

impl FilterDecision {
    /// Whether the card should be removed.
    #[must_use]
    pub fn is_remove(self) -> bool {
        matches!(self, Self::Remove(_))
    }

    /// Removal reason, if removed.
    #[must_use]
    pub fn removal_reason(self) -> Option<RemovalReason> {
        match self {
            Self::Remove(reason) => Some(reason),
            Self::Keep(_) => None,
        }
    }
}

/// List membership test, honoring the case-sensitivity toggle.
#[must_use]
pub fn list_contains(list: &[String], value: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        let value = value.to_lowercase();
        list.iter().any(|entry| entry.to_lowercase() == value)
    } else {
        list.iter().any(|entry| entry == value)
    }
}

fn channel_listed(list: &[String], channel: &ChannelInfo, config: &Config) -> bool {
    channel
        .list_keys()
        .iter()
        .any(|key| list_contains(list, key, config.case_insensitive_lists))
}

/// Decides whether a parsed card should be removed.
#[must_use]
pub fn should_remove(parsed: &ParsedVideoData, config: &Config) -> FilterDecision {
    if let Some(channel) = &parsed.channel {
        if config.enable_whitelist && channel_listed(&config.whitelist, channel, config) {
            return FilterDecision::Keep(KeepReason::Whitelisted);
        }
        if config.enable_blacklist && channel_listed(&config.blacklist, channel, config) {
            return FilterDecision::Remove(RemovalReason::Blacklist);
        }
    }

    if config.filter_all_shorts && parsed.is_short {
        return FilterDecision::Remove(RemovalReason::Short);
    }
    if config.filter_all_live_streams && parsed.is_live {
        return FilterDecision::Remove(RemovalReason::Live);
    }
    if parsed.is_live && config.skip_live_streams {
        return FilterDecision::Keep(KeepReason::LiveSkipped);
    }

    if parsed.views.is_none() && parsed.duration_seconds.is_none() {
        return FilterDecision::Keep(KeepReason::InsufficientData);
    }

    let views_low = parsed
        .views
        .is_some_and(|views| views > 0 && views < config.min_views);
    let duration_short = parsed
        .duration_seconds
        .is_some_and(|secs| secs > 0 && secs < config.min_duration_seconds);

    let remove = match config.filter_mode {
        FilterMode::Or => views_low || duration_short,
        FilterMode::And => match (parsed.views, parsed.duration_seconds) {
            (Some(_), Some(_)) => views_low && duration_short,
            (Some(_), None) => views_low,
            (None, _) => duration_short,
        },
    };

    if !remove {
        return FilterDecision::Keep(KeepReason::Passed);
    }

    let reason = if views_low {
        RemovalReason::Views
    } else if duration_short {
        RemovalReason::Duration
    } else {
        RemovalReason::Other
    };
    FilterDecision::Remove(reason)
}

/// Parses a card and decides its fate under `config`.
#[must_use]
pub fn evaluate_card(card: &Selection, config: &Config) -> FilterDecision {
    let parsed = extractor::parse_card(card);
    let decision = should_remove(&parsed, config);
    debug!(
        views = ?parsed.views,
        duration_seconds = ?parsed.duration_seconds,
        channel = parsed.channel.as_ref().map_or("", |c| c.id.as_str()),
        ?decision,
        "evaluated card"
    );
    decision
}
