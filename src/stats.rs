//! Removal statistics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::extractor::ChannelInfo;
use crate::policy::RemovalReason;

/// Running removal tallies.
///
/// Session counters always advance. `lifetime_total` advances only with
/// `enable_statistics`; the per-reason, per-channel and per-day maps only
/// with `enable_detailed_stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterStats {
    /// Removals across sessions.
    pub lifetime_total: u64,
    /// Removals since the tally was created or the session was reset.
    pub session_filtered: u64,
    /// Cards evaluated since the tally was created or the session was reset.
    pub total_processed: u64,
    pub by_reason: BTreeMap<RemovalReason, u64>,
    /// Keyed by channel display name.
    pub by_channel: BTreeMap<String, u64>,
    pub by_date: BTreeMap<NaiveDate, u64>,
}

impl FilterStats {
    /// Empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one removal.
    pub fn record(
        &mut self,
        reason: RemovalReason,
        channel: Option<&ChannelInfo>,
        day: NaiveDate,
        config: &Config,
    ) {
        self.session_filtered += 1;
        if config.enable_statistics {
            self.lifetime_total += 1;
        }
        if !config.enable_detailed_stats {
            return;
        }
        *self.by_reason.entry(reason).or_default() += 1;
        if let Some(channel) = channel.filter(|c| !c.display_name.is_empty()) {
            *self.by_channel.entry(channel.display_name.clone()).or_default() += 1;
        }
        *self.by_date.entry(day).or_default() += 1;
    }

    /// Counts evaluated cards, removed or not.
    pub fn record_processed(&mut self, count: usize) {
        self.total_processed += count as u64;
    }

    /// Removals tallied for `reason`.
    #[must_use]
    pub fn reason_count(&self, reason: RemovalReason) -> u64 {
        self.by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Channels with the most removals, highest first; ties by name.
    #[must_use]
    pub fn top_channels(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut channels: Vec<(&str, u64)> = self
            .by_channel
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        channels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        channels.truncate(limit);
        channels
    }

    /// Clears the session counters, keeping lifetime and detailed tallies.
    pub fn reset_session(&mut self) {
        self.session_filtered = 0;
        self.total_processed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn channel(name: &str) -> ChannelInfo {
        ChannelInfo {
            id: format!("@{name}"),
            display_name: name.to_string(),
            url: String::new(),
        }
    }

    #[test]
    fn test_basic_statistics_only() {
        let mut stats = FilterStats::new();
        stats.record(RemovalReason::Views, None, day(), &Config::default());
        assert_eq!(stats.lifetime_total, 1);
        assert_eq!(stats.session_filtered, 1);
        assert!(stats.by_reason.is_empty());
        assert!(stats.by_date.is_empty());
    }

    #[test]
    fn test_disabled_statistics_still_count_session() {
        let config = Config {
            enable_statistics: false,
            ..Config::default()
        };
        let mut stats = FilterStats::new();
        stats.record(RemovalReason::Short, None, day(), &config);
        assert_eq!(stats.lifetime_total, 0);
        assert_eq!(stats.session_filtered, 1);
    }

    #[test]
    fn test_detailed_tallies() {
        let config = Config {
            enable_detailed_stats: true,
            ..Config::default()
        };
        let mut stats = FilterStats::new();
        stats.record(RemovalReason::Views, Some(&channel("b")), day(), &config);
        stats.record(RemovalReason::Views, Some(&channel("a")), day(), &config);
        stats.record(RemovalReason::Duration, Some(&channel("b")), day(), &config);

        assert_eq!(stats.reason_count(RemovalReason::Views), 2);
        assert_eq!(stats.reason_count(RemovalReason::Live), 0);
        assert_eq!(stats.top_channels(1), vec![("b", 2)]);
        assert_eq!(stats.by_date.get(&day()), Some(&3));
    }

    #[test]
    fn test_serializes_with_readable_keys() {
        let config = Config {
            enable_detailed_stats: true,
            ..Config::default()
        };
        let mut stats = FilterStats::new();
        stats.record(RemovalReason::Blacklist, None, day(), &config);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains(r#""by_reason":{"blacklist":1}"#));
        assert!(json.contains(r#""by_date":{"2024-03-09":1}"#));

        let back: FilterStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_reset_session_keeps_lifetime() {
        let mut stats = FilterStats::new();
        stats.record(RemovalReason::Other, None, day(), &Config::default());
        stats.record_processed(4);
        stats.reset_session();
        assert_eq!(stats.lifetime_total, 1);
        assert_eq!(stats.session_filtered, 0);
        assert_eq!(stats.total_processed, 0);
    }
}
