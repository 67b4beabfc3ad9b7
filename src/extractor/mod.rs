//! Card metadata extraction.
//!
//! # Module Structure
//!
//! - `strategies`: ordered views/duration strategies (badge, metadata rows, text lines)
//! - `channel`: channel identity from the card's channel link
//! - `signals`: shorts and live-stream detection
//!
//! # Usage
//!
//! ```rust
//! use yt_card_filter::dom;
//! use yt_card_filter::extractor;
//!
//! let doc = dom::parse(r#"<ytd-video-renderer>
//!     <span role="text">12K views</span><span role="text">3:12</span>
//! </ytd-video-renderer>"#);
//! let card = doc.select("ytd-video-renderer");
//!
//! let parsed = extractor::parse_card(&card);
//! assert_eq!(parsed.views, Some(12_000));
//! assert_eq!(parsed.duration_seconds, Some(192));
//! ```

pub mod channel;
pub mod signals;
pub mod strategies;

use dom_query::Selection;
use serde::Serialize;
use tracing::debug;

use crate::dom;
use crate::patterns::LIVE_VIEWERS;
use crate::quantity::{parse_view_count, time_to_seconds};

pub use channel::{extract_channel_info, ChannelInfo};
pub use signals::{is_live_element, is_short_element};
pub use strategies::FieldHits;

/// Raw text fragments pulled from a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoText {
    /// View-count phrase, if one was found.
    pub views_text: Option<String>,
    /// Duration stamp, if one was found.
    pub duration_text: Option<String>,
    /// A concurrent-viewer phrase ("1.2K watching") was found.
    pub is_live: bool,
}

/// Parsed card data, derived fresh on every evaluation.
///
/// `None` means the text for that field was not found; `Some(0)` means
/// text was found but held no usable number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedVideoData {
    /// Parsed view count.
    pub views: Option<u64>,
    /// Parsed duration in seconds.
    pub duration_seconds: Option<u64>,
    /// Live stream, by viewer phrase or live signals.
    pub is_live: bool,
    /// Short, by any shorts signal.
    pub is_short: bool,
    /// Channel behind the card, if identifiable.
    pub channel: Option<ChannelInfo>,
}

/// Extracts views text, duration text and the live-viewer flag from a card.
#[must_use]
pub fn extract(card: &Selection) -> VideoText {
    let hits = strategies::run(card);
    let is_live = dom::visible_lines(card)
        .iter()
        .any(|line| LIVE_VIEWERS.is_match(line));

    debug!(
        tag = dom::tag_name(card).as_deref().unwrap_or(""),
        views = hits.views_text.as_deref().unwrap_or(""),
        duration = hits.duration_text.as_deref().unwrap_or(""),
        is_live,
        "extracted card text"
    );

    VideoText {
        views_text: hits.views_text,
        duration_text: hits.duration_text,
        is_live,
    }
}

/// Extracts and parses everything the filter policy looks at.
#[must_use]
pub fn parse_card(card: &Selection) -> ParsedVideoData {
    let text = extract(card);
    ParsedVideoData {
        views: text.views_text.as_deref().map(parse_view_count),
        duration_seconds: text.duration_text.as_deref().map(time_to_seconds),
        is_live: text.is_live || is_live_element(card),
        is_short: is_short_element(card),
        channel: extract_channel_info(card),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_falls_back_to_text_lines() {
        let doc = dom::parse(
            r#"<div id="card"><h3>Title</h3><div><p>Creator</p><p>45,231 views • 2 days ago</p></div><b>3:12</b></div>"#,
        );
        let text = extract(&doc.select("#card"));
        assert_eq!(text.views_text.as_deref(), Some("45,231 views"));
        assert_eq!(text.duration_text.as_deref(), Some("3:12"));
        assert!(!text.is_live);
    }

    #[test]
    fn test_extract_reads_views_split_by_inline_markup() {
        let doc = dom::parse(
            r#"<div id="card"><h3>Title</h3><p><b>45,231</b> views</p><p>3:12</p></div>"#,
        );
        let text = extract(&doc.select("#card"));
        assert_eq!(text.views_text.as_deref(), Some("45,231 views"));
        assert_eq!(text.duration_text.as_deref(), Some("3:12"));
    }

    #[test]
    fn test_extract_live_phrase_does_not_span_lines() {
        let doc = dom::parse(r#"<div id="card"><p>Episode 12</p><p>watching the finale</p></div>"#);
        assert!(!extract(&doc.select("#card")).is_live);
    }

    #[test]
    fn test_extract_flags_live_viewer_phrase() {
        let doc = dom::parse(r#"<div id="card"><span>1,204 watching</span></div>"#);
        let text = extract(&doc.select("#card"));
        assert!(text.is_live);
        assert!(text.views_text.is_none());
    }

    #[test]
    fn test_parse_card_keeps_absent_fields_as_none() {
        let doc = dom::parse(r#"<div id="card"><span>Only a title</span></div>"#);
        let parsed = parse_card(&doc.select("#card"));
        assert_eq!(parsed, ParsedVideoData::default());
    }

    #[test]
    fn test_parse_card_collects_channel_and_kind() {
        let doc = dom::parse(
            r#"<ytd-video-renderer id="card">
                <a href="/@maker">Maker</a>
                <a href="/shorts/xyz">clip</a>
                <span role="text">900 views</span>
            </ytd-video-renderer>"#,
        );
        let parsed = parse_card(&doc.select("#card"));
        assert_eq!(parsed.views, Some(900));
        assert!(parsed.is_short);
        assert_eq!(parsed.channel.map(|c| c.id), Some("@maker".to_string()));
    }
}
