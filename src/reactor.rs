//! Mutation reaction loop.
//!
//! The host feeds inserted nodes, navigation and scroll events into a
//! [`Reactor`] and calls [`Reactor::tick`] once per frame. Each card is
//! evaluated at most once per page lifetime; navigation starts a new one.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use dom_query::{NodeId, Selection};
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::dom;
use crate::error::{Error, Result};
use crate::extractor;
use crate::patterns::VIDEO_SELECTOR;
use crate::policy::{self, FilterDecision};
use crate::removal::RemovalSink;
use crate::scheduler::CoalescingScheduler;
use crate::settings::Settings;
use crate::stats::FilterStats;

/// Delay between a navigation and the full rescan.
pub const NAVIGATION_DELAY: Duration = Duration::from_millis(500);

/// Quiet window after the last scroll before a full rescan.
pub const SCROLL_DELAY: Duration = Duration::from_millis(300);

/// Drives card evaluation for one document.
pub struct Reactor<'a, S: RemovalSink> {
    root: Selection<'a>,
    settings: Settings,
    scheduler: CoalescingScheduler<Selection<'a>>,
    /// Cards already evaluated in this page lifetime.
    processed: HashSet<NodeId>,
    stats: FilterStats,
    sink: S,
    /// Full rescan after a navigation.
    navigation_rescan_at: Option<Instant>,
    /// Full rescan once scrolling has been quiet.
    scroll_rescan_at: Option<Instant>,
}

impl<'a, S: RemovalSink> Reactor<'a, S> {
    /// Creates a reactor over `root` (usually the document root).
    pub fn new(root: Selection<'a>, settings: Settings, sink: S) -> Self {
        let config = settings.config();
        let scheduler = CoalescingScheduler::new(
            Duration::from_millis(config.debounce_delay_ms),
            config.max_batch_size,
        );
        Self {
            root,
            settings,
            scheduler,
            processed: HashSet::new(),
            stats: FilterStats::new(),
            sink,
            navigation_rescan_at: None,
            scroll_rescan_at: None,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.settings.config()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Direct access for list editing and undo.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    #[must_use]
    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the reactor, returning its sink and statistics.
    pub fn finish(self) -> (S, FilterStats) {
        (self.sink, self.stats)
    }

    /// Whether `card` was already evaluated in this page lifetime.
    #[must_use]
    pub fn is_processed(&self, card: &Selection) -> bool {
        dom::node_id(card).is_some_and(|id| self.processed.contains(&id))
    }

    /// Single configuration mutation entry point.
    ///
    /// Cards already evaluated keep their outcome; later cards see the new
    /// values.
    pub fn update_config<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Config),
    {
        self.settings.update(f)?;
        self.sync_scheduler();
        Ok(())
    }

    /// Queues every card under the root for processing.
    pub fn start(&mut self, now: Instant) {
        self.sync_scheduler();
        self.navigation_rescan_at = None;
        self.scroll_rescan_at = None;
        self.queue_full_scan();
        trace!(?now, "reactor started");
    }

    /// Feeds inserted nodes into the debounce window.
    pub fn observe<I>(&mut self, nodes: I, now: Instant)
    where
        I: IntoIterator<Item = Selection<'a>>,
    {
        self.scheduler.push(nodes, now);
    }

    /// Resets markers and schedules a rescan for the new page.
    pub fn navigate(&mut self, now: Instant) {
        debug!(markers = self.processed.len(), "navigation, resetting markers");
        self.processed.clear();
        self.scheduler.cancel();
        self.navigation_rescan_at = Some(now + NAVIGATION_DELAY);
    }

    /// Schedules a rescan once scrolling has been quiet for [`SCROLL_DELAY`].
    ///
    /// A pending navigation rescan keeps its own deadline.
    pub fn scroll(&mut self, now: Instant) {
        self.scroll_rescan_at = Some(now + SCROLL_DELAY);
    }

    /// When the host should call [`tick`](Self::tick) next.
    #[must_use]
    pub fn next_wake(&self, now: Instant) -> Option<Instant> {
        [
            self.scheduler.next_wake(now),
            self.navigation_rescan_at,
            self.scroll_rescan_at,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Runs due rescans, then processes one chunk of candidates.
    ///
    /// Returns the number of cards evaluated.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.sync_scheduler();
        let navigation_due = take_due(&mut self.navigation_rescan_at, now);
        let scroll_due = take_due(&mut self.scroll_rescan_at, now);
        if navigation_due || scroll_due {
            self.queue_full_scan();
        }

        let chunk = self.scheduler.poll(now);
        if chunk.is_empty() {
            return 0;
        }

        let evaluated: usize = chunk.iter().map(|node| self.process_candidate(node)).sum();
        self.stats.record_processed(evaluated);
        if evaluated > 0 {
            debug!(
                candidates = chunk.len(),
                evaluated,
                queued = self.scheduler.len(),
                total = self.stats.total_processed,
                "processed chunk"
            );
        }
        evaluated
    }

    /// Evaluates one card.
    ///
    /// Returns `Ok(None)` when the card was already evaluated in this page
    /// lifetime. Otherwise marks it, decides with the current configuration,
    /// notifies the sink on removal and tallies statistics.
    pub fn process_card(&mut self, card: &Selection) -> Result<Option<FilterDecision>> {
        let Some(id) = dom::node_id(card) else {
            return Ok(None);
        };
        if !self.processed.insert(id) {
            return Ok(None);
        }

        let parsed = extractor::parse_card(card);
        let config = self.settings.config();
        let decision = policy::should_remove(&parsed, config);
        trace!(?decision, "card decision");

        if let Some(reason) = decision.removal_reason() {
            // Nested cards go with their container.
            for inner in dom::split(&dom::query_selector_all(card, VIDEO_SELECTOR)) {
                if let Some(inner_id) = dom::node_id(&inner) {
                    self.processed.insert(inner_id);
                }
            }
            self.sink.on_remove(card, reason, parsed.channel.as_ref())?;
            self.stats
                .record(reason, parsed.channel.as_ref(), Utc::now().date_naive(), config);
        }
        Ok(Some(decision))
    }

    fn process_candidate(&mut self, node: &Selection) -> usize {
        if !dom::is_element(node) {
            return 0;
        }

        let mut cards = Vec::new();
        if dom::matches(node, VIDEO_SELECTOR) {
            cards.push(node.clone());
        }
        cards.extend(dom::split(&dom::query_selector_all(node, VIDEO_SELECTOR)));

        let mut evaluated = 0;
        for card in &cards {
            match self.process_card(card) {
                Ok(Some(_)) => evaluated += 1,
                Ok(None) => {}
                Err(Error::Detached) => {
                    evaluated += 1;
                    debug!("card detached before removal");
                }
                Err(err) => {
                    evaluated += 1;
                    warn!(error = %err, "card processing failed");
                }
            }
        }
        evaluated
    }

    fn queue_full_scan(&mut self) {
        let cards = dom::split(&dom::query_selector_all(&self.root, VIDEO_SELECTOR));
        debug!(cards = cards.len(), "full scan");
        self.scheduler.submit(cards);
    }

    fn sync_scheduler(&mut self) {
        let config = self.settings.config();
        self.scheduler
            .set_quiet(Duration::from_millis(config.debounce_delay_ms));
        self.scheduler.set_chunk_size(config.max_batch_size);
    }
}

/// Clears `deadline` and reports `true` once it has passed.
fn take_due(deadline: &mut Option<Instant>, now: Instant) -> bool {
    if deadline.is_some_and(|at| now >= at) {
        *deadline = None;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{KeepReason, RemovalReason};
    use crate::removal::{DomRemover, RecordingSink};
    use crate::settings::MemoryStore;

    const PAGE: &str = r#"<div id="grid">
        <ytd-rich-item-renderer id="low"><span role="text">500 views</span><span role="text">12:00</span></ytd-rich-item-renderer>
        <ytd-rich-item-renderer id="ok"><span role="text">2M views</span><span role="text">12:00</span></ytd-rich-item-renderer>
        <ytd-rich-item-renderer id="short"><span role="text">3M views</span><span role="text">0:45</span></ytd-rich-item-renderer>
    </div>"#;

    fn settings(config: Config) -> Settings {
        Settings::with_config(config, Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_start_and_tick_remove_failing_cards() {
        let doc = dom::parse(PAGE);
        let t0 = Instant::now();
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), DomRemover::new());

        reactor.start(t0);
        assert_eq!(reactor.tick(t0), 3);

        assert!(!doc.select("#low").exists());
        assert!(doc.select("#ok").exists());
        assert!(!doc.select("#short").exists());
        assert_eq!(reactor.stats().session_filtered, 2);
        assert_eq!(reactor.stats().total_processed, 3);
    }

    #[test]
    fn test_process_card_is_idempotent() {
        let doc = dom::parse(PAGE);
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), RecordingSink::default());
        let card = doc.select("#ok");

        assert_eq!(
            reactor.process_card(&card).unwrap(),
            Some(FilterDecision::Keep(KeepReason::Passed))
        );
        assert_eq!(reactor.process_card(&card).unwrap(), None);
        assert!(reactor.is_processed(&card));
    }

    #[test]
    fn test_chunks_respect_batch_size() {
        let doc = dom::parse(PAGE);
        let t0 = Instant::now();
        let config = Config {
            max_batch_size: 2,
            ..Config::default()
        };
        let mut reactor = Reactor::new(dom::root(&doc), settings(config), RecordingSink::default());
        reactor.start(t0);

        assert_eq!(reactor.tick(t0), 2);
        assert_eq!(reactor.tick(t0), 1);
        assert_eq!(reactor.tick(t0), 0);
    }

    #[test]
    fn test_observed_nodes_wait_for_quiet_window() {
        let doc = dom::parse(PAGE);
        let t0 = Instant::now();
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), RecordingSink::default());

        reactor.observe(dom::split(&doc.select("#grid")), t0);
        assert_eq!(reactor.tick(t0 + Duration::from_millis(10)), 0);
        assert_eq!(reactor.next_wake(t0), Some(t0 + Duration::from_millis(30)));
        assert_eq!(reactor.tick(t0 + Duration::from_millis(30)), 3);
        assert_eq!(reactor.sink().removals.len(), 2);
    }

    #[test]
    fn test_navigation_resets_markers_after_delay() {
        let doc = dom::parse(PAGE);
        let t0 = Instant::now();
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), RecordingSink::default());
        reactor.start(t0);
        reactor.tick(t0);
        assert!(reactor.is_processed(&doc.select("#ok")));

        reactor.navigate(t0);
        assert!(!reactor.is_processed(&doc.select("#ok")));
        assert_eq!(reactor.tick(t0 + Duration::from_millis(499)), 0);
        assert_eq!(reactor.tick(t0 + NAVIGATION_DELAY), 3);
    }

    #[test]
    fn test_scroll_rescan_is_debounced() {
        let doc = dom::parse(PAGE);
        let t0 = Instant::now();
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), RecordingSink::default());

        reactor.scroll(t0);
        reactor.scroll(t0 + Duration::from_millis(200));
        assert_eq!(reactor.tick(t0 + Duration::from_millis(300)), 0);
        assert_eq!(reactor.tick(t0 + Duration::from_millis(500)), 3);
        // Already-processed cards are skipped by later rescans.
        reactor.scroll(t0 + Duration::from_millis(600));
        assert_eq!(reactor.tick(t0 + Duration::from_millis(900)), 0);
    }

    #[test]
    fn test_scroll_does_not_move_navigation_rescan() {
        let doc = dom::parse(PAGE);
        let t0 = Instant::now();
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), RecordingSink::default());
        reactor.start(t0);
        reactor.tick(t0);

        reactor.navigate(t0);
        reactor.scroll(t0 + Duration::from_millis(10));
        assert_eq!(reactor.next_wake(t0), Some(t0 + Duration::from_millis(310)));

        // The scroll rescan only sees the markers that navigation cleared.
        assert_eq!(reactor.tick(t0 + Duration::from_millis(310)), 3);
        assert_eq!(reactor.next_wake(t0 + Duration::from_millis(310)), Some(t0 + NAVIGATION_DELAY));
        assert_eq!(reactor.tick(t0 + NAVIGATION_DELAY), 0);
        assert_eq!(reactor.next_wake(t0 + NAVIGATION_DELAY), None);
    }

    #[test]
    fn test_config_update_applies_to_later_cards_only() {
        let doc = dom::parse(PAGE);
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), RecordingSink::default());

        let first = reactor.process_card(&doc.select("#low")).unwrap();
        assert_eq!(first, Some(FilterDecision::Remove(RemovalReason::Views)));

        reactor
            .update_config(|c| {
                c.min_views = 0;
                c.min_duration_seconds = 0;
            })
            .unwrap();
        assert_eq!(
            reactor.process_card(&doc.select("#short")).unwrap(),
            Some(FilterDecision::Keep(KeepReason::Passed))
        );
        assert_eq!(reactor.sink().removals.len(), 1);
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let doc = dom::parse(PAGE);
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), RecordingSink::default());
        assert!(reactor.update_config(|c| c.max_batch_size = 0).is_err());
        assert_eq!(reactor.config().max_batch_size, 50);
    }

    #[test]
    fn test_nested_cards_removed_once() {
        let doc = dom::parse(
            r#"<div id="grid"><ytd-rich-item-renderer id="outer"><yt-lockup-view-model id="inner"><span role="text">12 views</span></yt-lockup-view-model></ytd-rich-item-renderer></div>"#,
        );
        let t0 = Instant::now();
        let mut reactor = Reactor::new(dom::root(&doc), settings(Config::default()), DomRemover::new());
        reactor.start(t0);
        reactor.tick(t0);

        assert!(!doc.select("#outer").exists());
        assert_eq!(reactor.sink().removed().len(), 1);
        assert_eq!(reactor.stats().session_filtered, 1);
    }
}
