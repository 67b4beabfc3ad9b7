//! Shorts and live-stream detection.
//!
//! Each kind of card is recognized by several independent signals; any one
//! positive signal is enough, and no signal means `false`.

use std::sync::LazyLock;

use dom_query::Selection;
use regex::Regex;

use crate::dom;
use crate::patterns::{
    LIVE_BADGE_SELECTOR, LIVE_PHRASE, LIVE_WORD, SHORTS_BADGE_SELECTOR, SHORTS_CONTAINER_SELECTOR,
    SHORTS_LINK_SELECTOR, SHORTS_TAG,
};

/// One way of recognizing a card kind.
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    /// The card's own tag name matches.
    TagName(&'static LazyLock<Regex>),
    /// The card is, or sits inside, a matching container.
    Container(&'static str),
    /// The card contains a matching link.
    Link(&'static str),
    /// The card contains a matching badge element.
    Badge(&'static str),
    /// The card's own aria-label matches (lowercased).
    AriaLabel(&'static LazyLock<Regex>),
    /// The card's text matches (lowercased).
    Text(&'static LazyLock<Regex>),
}

impl Signal {
    /// Whether this signal fires for `card`.
    #[must_use]
    pub fn fires(self, card: &Selection) -> bool {
        match self {
            Self::TagName(pattern) => dom::tag_name(card).is_some_and(|tag| pattern.is_match(&tag)),
            Self::Container(selector) => dom::closest(card, selector).is_some(),
            Self::Link(selector) | Self::Badge(selector) => dom::has_descendant(card, selector),
            Self::AriaLabel(pattern) => dom::get_attribute(card, "aria-label")
                .is_some_and(|label| pattern.is_match(&label.to_lowercase())),
            Self::Text(pattern) => pattern.is_match(&dom::text_content(card).to_lowercase()),
        }
    }
}

/// Signals that mark a card as a short.
pub static SHORT_SIGNALS: &[Signal] = &[
    Signal::TagName(&SHORTS_TAG),
    Signal::Container(SHORTS_CONTAINER_SELECTOR),
    Signal::Link(SHORTS_LINK_SELECTOR),
    Signal::Badge(SHORTS_BADGE_SELECTOR),
];

/// Signals that mark a card as a live stream.
pub static LIVE_SIGNALS: &[Signal] = &[
    Signal::Text(&LIVE_PHRASE),
    Signal::AriaLabel(&LIVE_WORD),
    Signal::Badge(LIVE_BADGE_SELECTOR),
];

/// Whether the card is a short.
#[must_use]
pub fn is_short_element(card: &Selection) -> bool {
    card.exists() && SHORT_SIGNALS.iter().any(|signal| signal.fires(card))
}

/// Whether the card is a live stream.
#[must_use]
pub fn is_live_element(card: &Selection) -> bool {
    card.exists() && LIVE_SIGNALS.iter().any(|signal| signal.fires(card))
}
