//! Compiled regex patterns and CSS selectors for card inspection.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.
//! Patterns are organized by the pipeline stage that uses them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Quantity Patterns (applied to normalized, lowercased text)
// =============================================================================

/// First numeric token plus the multiplier word glued to it, if any.
///
/// The token may carry space-separated three-digit groups (`45 231`), as
/// written on French and Russian pages once `normalize` has turned
/// U+00A0/U+202F into plain spaces.
/// Longer suffixes come first so `lakh` wins over `l` and `bn` over `b`.
/// The suffix must end at a word boundary or a period: `5m views` and
/// `1,2 тыс.` carry a multiplier, `5 minutes` does not.
pub static VIEW_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<num>[0-9]+(?:[.,][0-9]+)*(?: [0-9]{3}\b)*)\s*(?:(?P<suffix>crore|lakh|lac|billion|million|thousand|тыс|млн|bn|mn|l|b|m|k)(?:\b|\.|$))?",
    )
    .expect("VIEW_NUMBER regex")
});

/// A number written with thousands grouping: `45,231`, `1.234.567`,
/// `1 234 567`, or the Indian `12,34,567`.
pub static GROUPED_THOUSANDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}(?:[., ][0-9]{3})+$|^[0-9]{1,2}(?:,[0-9]{2})+,[0-9]{3}$")
        .expect("GROUPED_THOUSANDS regex")
});

/// First contiguous `digits(:digits)*` run.
pub static TIME_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?::[0-9]+)*").expect("TIME_RUN regex")
});

// =============================================================================
// Extraction Patterns (applied to raw card text)
// =============================================================================

/// View-count phrase: number, optional multiplier, localized "views" word.
///
/// Space-grouped thousands (`45\u{202f}231 vues`) stay one number.
pub static VIEWS_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d+(?:[.,]\d+)*(?:[ \u{a0}\u{202f}]\d{3}\b)*\s*(?:[KMB]|тыс\.?|млн|crore|lakh|lac)?\s*(?:views?|visualizações|visualizaciones|vues|aufrufe|просмотров|просмотра|просмотр|次|مشاهدة)",
    )
    .expect("VIEWS_TEXT regex")
});

/// `H:MM:SS` / `MM:SS` duration stamp.
pub static DURATION_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}:\d{2}(?::\d{2})?").expect("DURATION_TEXT regex")
});

/// Concurrent-viewer phrase shown on live streams (`1,204 watching`, `2.1K watching`).
pub static LIVE_VIEWERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:[.,]\d+)*\s*(?:[KMB]\s*)?(?:watching|viewers|ライブ視聴中)")
        .expect("LIVE_VIEWERS regex")
});

/// Localized "live" phrases, matched against lowercased card text.
pub static LIVE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"live now|\blive\b|прямой эфир|أثناء البث|en directo").expect("LIVE_PHRASE regex")
});

/// Standalone "live" word, matched against a lowercased aria-label.
pub static LIVE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\blive\b").expect("LIVE_WORD regex")
});

/// Channel identity segment of a channel href.
pub static CHANNEL_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(channel/[^/?#]+|@[^/?#]+)").expect("CHANNEL_HREF regex")
});

/// Tag names used by shorts renderers.
pub static SHORTS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"reel|shorts").expect("SHORTS_TAG regex")
});

/// Runs of whitespace, collapsed when reading display names.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

// =============================================================================
// CSS Selectors (as strings for use with dom_query)
// =============================================================================

/// Elements that represent one video card, as one selector group.
pub const VIDEO_SELECTOR: &str = "ytd-rich-item-renderer, ytd-video-renderer, ytd-grid-video-renderer, \
     ytd-compact-video-renderer, ytd-playlist-video-renderer, ytd-rich-grid-media, \
     yt-lockup-view-model, ytd-lockup-view-model, ytd-reel-item-renderer, \
     ytd-shorts-grid-renderer, ytd-reel-shelf-renderer, ytd-rich-section-renderer";

/// Containers detached when a card is removed, tried in order.
pub const CARD_CONTAINER_SELECTORS: &[&str] = &[
    "ytd-rich-item-renderer",
    "ytd-video-renderer",
    "ytd-grid-video-renderer",
    "ytd-compact-video-renderer",
    "ytd-playlist-video-renderer",
    "ytd-reel-item-renderer",
    "ytd-rich-grid-media",
    "ytd-rich-shelf-renderer",
    "yt-lockup-view-model",
];

/// Duration badge on the thumbnail (new lockup cards and classic overlay).
pub const DURATION_BADGE_SELECTOR: &str = "yt-thumbnail-badge-view-model .yt-badge-shape__text, \
     ytd-thumbnail-overlay-time-status-renderer #text, \
     ytd-thumbnail-overlay-time-status-renderer span";

/// Metadata-row style elements that carry views and duration text.
pub const METADATA_ROW_SELECTOR: &str = "[role=\"text\"], .metadata-row span, ytd-formatted-string, \
     .yt-content-metadata-view-model__metadata-row span, #metadata-line span";

/// Anchors that link to a channel page.
pub const CHANNEL_LINK_SELECTOR: &str = "a[href*=\"/channel/\"], a[href*=\"/@\"]";

/// Shorts shelf and item containers.
pub const SHORTS_CONTAINER_SELECTOR: &str =
    "ytd-reel-item-renderer, ytd-shorts-grid-renderer, ytd-reel-shelf-renderer";

/// Links into the shorts player.
pub const SHORTS_LINK_SELECTOR: &str = "a[href*=\"/shorts/\"]";

/// Shorts badges.
pub const SHORTS_BADGE_SELECTOR: &str =
    "[aria-label*=\"Shorts\"], [aria-label*=\"shorts\"], .badge-shorts, .yt-badge-shorts";

/// Live badges.
pub const LIVE_BADGE_SELECTOR: &str = ".badge-live, [aria-label*=\"LIVE\"], [title*=\"LIVE\"]";
