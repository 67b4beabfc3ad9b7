//! Removal collaborators.
//!
//! The reactor decides; a [`RemovalSink`] acts on the decision. The DOM
//! remover detaches the card's container from the document, the recording
//! sink only remembers what would have been removed.

use dom_query::Selection;
use serde::Serialize;
use tracing::{debug, trace};

use crate::dom;
use crate::error::{Error, Result};
use crate::extractor::ChannelInfo;
use crate::patterns::CARD_CONTAINER_SELECTORS;
use crate::policy::RemovalReason;

/// Ancestors inspected by the container fallback.
pub const PARENT_TRAVERSAL_MAX_DEPTH: usize = 10;

/// Receives removal decisions.
pub trait RemovalSink {
    /// Called once for every card the policy removes.
    fn on_remove(
        &mut self,
        card: &Selection,
        reason: RemovalReason,
        channel: Option<&ChannelInfo>,
    ) -> Result<()>;
}

/// One removed (or would-be removed) card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    /// Tag of the card element.
    pub tag: String,
    /// Tag of the element actually detached; equals `tag` for dry runs.
    pub container_tag: String,
    pub reason: RemovalReason,
    pub channel: Option<ChannelInfo>,
}

impl Removal {
    fn new(card: &Selection, container: &Selection, reason: RemovalReason, channel: Option<&ChannelInfo>) -> Self {
        Self {
            tag: dom::tag_name(card).unwrap_or_default(),
            container_tag: dom::tag_name(container).unwrap_or_default(),
            reason,
            channel: channel.cloned(),
        }
    }
}

/// Resolves the element to detach for `card`.
///
/// Tries the known card containers (ancestor-or-self) in order, then the
/// first ancestor within [`PARENT_TRAVERSAL_MAX_DEPTH`] levels whose tag
/// contains `ytd-` or whose class mentions `video` or `item`, then the card
/// itself.
#[must_use]
pub fn container_to_remove<'a>(card: &Selection<'a>) -> Selection<'a> {
    for selector in CARD_CONTAINER_SELECTORS {
        if let Some(container) = dom::closest(card, selector) {
            trace!(selector, "container found");
            return container;
        }
    }

    let mut current = dom::parent(card);
    for _ in 0..PARENT_TRAVERSAL_MAX_DEPTH {
        if !current.exists() {
            break;
        }
        if dom::is_element(&current) && looks_like_container(&current) {
            trace!(tag = dom::tag_name(&current).as_deref().unwrap_or(""), "fallback container");
            return current;
        }
        current = dom::parent(&current);
    }
    card.clone()
}

fn looks_like_container(sel: &Selection) -> bool {
    let tag_match = dom::tag_name(sel).is_some_and(|tag| tag.contains("ytd-"));
    let class_match = dom::class_name(sel).is_some_and(|class| class.contains("video") || class.contains("item"));
    tag_match || class_match
}

/// Detaches card containers from the document.
#[derive(Debug, Default)]
pub struct DomRemover {
    removed: Vec<Removal>,
}

impl DomRemover {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removals performed so far.
    #[must_use]
    pub fn removed(&self) -> &[Removal] {
        &self.removed
    }

    #[must_use]
    pub fn into_removed(self) -> Vec<Removal> {
        self.removed
    }
}

impl RemovalSink for DomRemover {
    fn on_remove(
        &mut self,
        card: &Selection,
        reason: RemovalReason,
        channel: Option<&ChannelInfo>,
    ) -> Result<()> {
        let container = container_to_remove(card);
        if !dom::parent(&container).exists() {
            return Err(Error::Detached);
        }
        let removal = Removal::new(card, &container, reason, channel);
        debug!(container = %removal.container_tag, %reason, "removing card");
        dom::remove(&container);
        self.removed.push(removal);
        Ok(())
    }
}

/// Ignores every removal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl RemovalSink for NoopSink {
    fn on_remove(&mut self, _card: &Selection, _reason: RemovalReason, _channel: Option<&ChannelInfo>) -> Result<()> {
        Ok(())
    }
}

/// Records removals without touching the document.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub removals: Vec<Removal>,
}

impl RemovalSink for RecordingSink {
    fn on_remove(
        &mut self,
        card: &Selection,
        reason: RemovalReason,
        channel: Option<&ChannelInfo>,
    ) -> Result<()> {
        self.removals.push(Removal::new(card, card, reason, channel));
        Ok(())
    }
}
