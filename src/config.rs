//! Filter configuration.
//!
//! The `Config` struct holds the thresholds, combination mode, list toggles
//! and list contents the filter policy reads at evaluation time. It is
//! persisted as a JSON object whose keys follow the saved-settings layout
//! (`MIN_VIEWS`, `FILTER_MODE`, ...); missing keys fall back to defaults.
//! Keys the filter does not read (`THEME`, `SHOW_COUNTER`, ...) belong to
//! the settings UI; they are carried in `extra` and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// How the views-low and duration-short conditions combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterMode {
    /// Remove when both conditions hold (or the only available one).
    And,
    /// Remove when either condition holds.
    #[default]
    Or,
}

/// Configuration options for card filtering.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use yt_card_filter::{Config, FilterMode};
///
/// let config = Config {
///     min_views: 10_000,
///     filter_mode: FilterMode::And,
///     ..Config::default()
/// };
/// assert_eq!(config.min_duration_seconds, 240);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Cards with fewer views are "views low".
    ///
    /// Default: `99999`
    pub min_views: u64,

    /// Cards shorter than this many seconds are "duration short".
    ///
    /// Default: `240`
    pub min_duration_seconds: u64,

    /// Combination of the two threshold conditions.
    ///
    /// Default: `FilterMode::Or`
    pub filter_mode: FilterMode,

    /// Quiet window before inserted cards are processed, in milliseconds.
    ///
    /// Default: `30`
    #[serde(rename = "DEBOUNCE_DELAY")]
    pub debounce_delay_ms: u64,

    /// Candidate nodes processed per tick.
    ///
    /// Default: `50`
    pub max_batch_size: usize,

    /// Verbose logging in the bundled binary.
    ///
    /// Default: `false`
    pub debug: bool,

    /// Never filter live streams by thresholds.
    ///
    /// Default: `false`
    pub skip_live_streams: bool,

    /// Remove every live stream.
    ///
    /// Default: `false`
    pub filter_all_live_streams: bool,

    /// Remove every short.
    ///
    /// Default: `false`
    pub filter_all_shorts: bool,

    /// Channels never filtered (id, handle, name or URL).
    ///
    /// Default: empty
    pub whitelist: Vec<String>,

    /// Channels always filtered (id, handle, name or URL).
    ///
    /// Default: empty
    pub blacklist: Vec<String>,

    /// Apply the whitelist.
    ///
    /// Default: `false`
    pub enable_whitelist: bool,

    /// Apply the blacklist.
    ///
    /// Default: `false`
    pub enable_blacklist: bool,

    /// Compare list entries ignoring case.
    ///
    /// Default: `true`
    pub case_insensitive_lists: bool,

    /// Count removals in the lifetime total.
    ///
    /// Default: `true`
    pub enable_statistics: bool,

    /// Tally removals by reason, channel and day.
    ///
    /// Default: `false`
    pub enable_detailed_stats: bool,

    /// Saved keys owned by other components, preserved across saves.
    ///
    /// Default: empty
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_views: 99_999,
            min_duration_seconds: 240,
            filter_mode: FilterMode::Or,
            debounce_delay_ms: 30,
            max_batch_size: 50,
            debug: false,
            skip_live_streams: false,
            filter_all_live_streams: false,
            filter_all_shorts: false,
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            enable_whitelist: false,
            enable_blacklist: false,
            case_insensitive_lists: true,
            enable_statistics: true,
            enable_detailed_stats: false,
            extra: Map::new(),
        }
    }
}

impl Config {
    /// Parses a saved settings object, merging it over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to the saved settings layout.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks invariants the type system does not cover.
    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == 0 {
            return Err(Error::InvalidConfig("MAX_BATCH_SIZE must be at least 1".to_string()));
        }
        for (name, list) in [("WHITELIST", &self.whitelist), ("BLACKLIST", &self.blacklist)] {
            if list.iter().any(|entry| entry.trim().is_empty()) {
                return Err(Error::InvalidConfig(format!("{name} contains a blank entry")));
            }
        }
        Ok(())
    }
}
