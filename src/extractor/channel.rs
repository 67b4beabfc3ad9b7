//! Channel identity extraction.

use dom_query::Selection;
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

use crate::dom;
use crate::patterns::{CHANNEL_HREF, CHANNEL_LINK_SELECTOR, WHITESPACE_NORMALIZE};

/// Base used to resolve relative channel links.
pub const PAGE_ORIGIN: &str = "https://www.youtube.com";

/// Channel identity taken from a card's channel link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// `channel/<id>` or `@handle` segment of the link.
    pub id: String,

    /// Link text as shown on the card.
    pub display_name: String,

    /// Absolute link URL.
    pub url: String,
}

impl ChannelInfo {
    /// Values compared against whitelist/blacklist entries.
    #[must_use]
    pub fn list_keys(&self) -> [&str; 3] {
        [&self.id, &self.display_name, &self.url]
    }
}

/// Extracts the channel behind the first channel link in the card.
///
/// Returns `None` when there is no channel link, the href has no channel
/// segment, or the link text is empty. Callers treat `None` as "channel
/// unknown" and skip list checks.
#[must_use]
pub fn extract_channel_info(card: &Selection) -> Option<ChannelInfo> {
    let link = dom::query_selector(card, CHANNEL_LINK_SELECTOR);
    if !link.exists() {
        return None;
    }

    let href = dom::get_attribute(&link, "href")?;
    let url = resolve_href(&href)?;
    let id = CHANNEL_HREF.captures(&url)?.get(1)?.as_str().to_string();

    let text = dom::text_content(&link);
    let display_name = WHITESPACE_NORMALIZE.replace_all(text.trim(), " ").into_owned();
    if id.is_empty() || display_name.is_empty() {
        trace!(href = %href, "channel link without id or name");
        return None;
    }

    Some(ChannelInfo { id, display_name, url })
}

fn resolve_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let base = Url::parse(PAGE_ORIGIN).ok()?;
    base.join(href).ok().map(String::from)
}
