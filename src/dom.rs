//! DOM Operations Adapter
//!
//! Browser-style element operations (`closest`, `innerText` lines, attribute
//! reads) over the `dom_query` crate. Everything that touches the card
//! markup goes through here.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, Selection};

pub use tendril::StrTendril;

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    get_attribute(sel, "class")
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Identity of the first node in the selection.
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|node| node.id)
}

/// Whether the first node is an element.
#[must_use]
pub fn is_element(sel: &Selection) -> bool {
    sel.nodes().first().is_some_and(dom_query::NodeRef::is_element)
}

// === Text Content ===

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Tags laid out as blocks; each one starts and ends a line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tbody",
    "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Tags whose text is never rendered.
const HIDDEN_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// Visible text split into trimmed, non-empty lines.
///
/// Approximates `innerText`: lines break only at block elements and `<br>`,
/// inline text is joined with collapsed ASCII whitespace, and hidden tags
/// are skipped. Custom elements (`ytd-*`, `yt-*`) are laid out as blocks.
/// Adjacent inline elements are separated by a space so numbers in
/// neighbouring elements never fuse.
#[must_use]
pub fn visible_lines(sel: &Selection) -> Vec<String> {
    let mut lines = LineBuilder::default();
    for root in sel.nodes() {
        collect_lines(root, &mut lines);
        lines.hard_break();
    }
    lines.lines
}

fn collect_lines(node: &dom_query::NodeRef, out: &mut LineBuilder) {
    if node.is_text() {
        out.push_text(&node.text());
        return;
    }
    if !node.is_element() {
        for child in node.children() {
            collect_lines(&child, out);
        }
        return;
    }

    let name = node
        .node_name()
        .map(|name| name.to_ascii_lowercase())
        .unwrap_or_default();
    if HIDDEN_TAGS.contains(&name.as_str()) {
        return;
    }
    if name == "br" {
        out.hard_break();
        return;
    }

    let block = BLOCK_TAGS.contains(&name.as_str()) || name.contains('-');
    out.boundary(block);
    for child in node.children() {
        collect_lines(&child, out);
    }
    out.boundary(block);
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<String>,
    current: String,
    pending_space: bool,
}

impl LineBuilder {
    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_ascii_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && !self.current.is_empty() {
                self.current.push(' ');
            }
            self.pending_space = false;
            self.current.push(c);
        }
    }

    fn boundary(&mut self, block: bool) {
        if block {
            self.hard_break();
        } else {
            self.pending_space = true;
        }
    }

    fn hard_break(&mut self) {
        let line = self.current.trim();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        self.current.clear();
        self.pending_space = false;
    }
}

// === Tree Navigation ===

/// Get parent element
#[inline]
#[must_use]
pub fn parent<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.parent()
}

/// Nearest ancestor-or-self matching `selector`.
#[must_use]
pub fn closest<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    let mut current = sel.clone();
    while current.exists() {
        if is_element(&current) && current.is(selector) {
            return Some(current);
        }
        current = parent(&current);
    }
    None
}

/// Whether the selection itself matches `selector`.
#[inline]
#[must_use]
pub fn matches(sel: &Selection, selector: &str) -> bool {
    is_element(sel) && sel.is(selector)
}

// === Querying ===

/// Query single element by CSS selector
#[inline]
#[must_use]
pub fn query_selector<'a>(sel: &Selection<'a>, selector: &str) -> Selection<'a> {
    sel.select_single(selector)
}

/// Query all elements by CSS selector
#[inline]
#[must_use]
pub fn query_selector_all<'a>(sel: &Selection<'a>, selector: &str) -> Selection<'a> {
    sel.select(selector)
}

/// Whether any descendant matches `selector`.
#[inline]
#[must_use]
pub fn has_descendant(sel: &Selection, selector: &str) -> bool {
    query_selector(sel, selector).exists()
}

/// Split a selection into one selection per node.
#[must_use]
pub fn split<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().map(|node| Selection::from(*node)).collect()
}

// === Tree Manipulation ===

/// Remove elements from tree
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Selection over the document node itself.
#[inline]
#[must_use]
pub fn root(doc: &Document) -> Selection<'_> {
    Selection::from(doc.root())
}
