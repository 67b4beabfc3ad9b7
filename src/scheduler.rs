//! Coalescing, chunked work scheduler.
//!
//! Bursts of inserted nodes are buffered until the page has been quiet for
//! the debounce window, then handed out in chunks of at most `chunk_size`
//! items, one chunk per host frame. A continuous stream of insertions still
//! flushes once the max-wait bound passes.
//!
//! The scheduler never reads a clock; every call takes the current `Instant`.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Lower bound of the max-wait deadline.
pub const MIN_MAX_WAIT: Duration = Duration::from_millis(200);

/// Where the scheduler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing buffered or queued.
    Idle,
    /// Items buffered, waiting for the quiet window.
    PendingBatch,
    /// Items queued for chunked processing.
    Flushing,
}

/// Debounces pushed items and releases them in bounded chunks.
#[derive(Debug)]
pub struct CoalescingScheduler<T> {
    quiet: Duration,
    chunk_size: usize,
    pending: Vec<T>,
    queue: VecDeque<T>,
    quiet_deadline: Option<Instant>,
    max_deadline: Option<Instant>,
}

impl<T> CoalescingScheduler<T> {
    /// Creates a scheduler with the given quiet window and chunk size.
    ///
    /// A zero chunk size is treated as one.
    #[must_use]
    pub fn new(quiet: Duration, chunk_size: usize) -> Self {
        Self {
            quiet,
            chunk_size: chunk_size.max(1),
            pending: Vec::new(),
            queue: VecDeque::new(),
            quiet_deadline: None,
            max_deadline: None,
        }
    }

    /// Changes the quiet window for subsequent pushes.
    pub fn set_quiet(&mut self, quiet: Duration) {
        self.quiet = quiet;
    }

    /// Changes the chunk size for subsequent polls.
    pub fn set_chunk_size(&mut self, chunk_size: usize) {
        self.chunk_size = chunk_size.max(1);
    }

    /// Upper bound on how long a pending batch can wait.
    #[must_use]
    pub fn max_wait(&self) -> Duration {
        self.quiet.max(MIN_MAX_WAIT)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if !self.queue.is_empty() {
            Phase::Flushing
        } else if !self.pending.is_empty() {
            Phase::PendingBatch
        } else {
            Phase::Idle
        }
    }

    /// Items buffered or queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + self.queue.len()
    }

    /// Whether nothing is buffered or queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.queue.is_empty()
    }

    /// Buffers items and restarts the quiet window.
    pub fn push<I>(&mut self, items: I, now: Instant)
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.pending.len();
        self.pending.extend(items);
        if self.pending.len() == before {
            return;
        }
        self.quiet_deadline = Some(now + self.quiet);
        if self.max_deadline.is_none() {
            self.max_deadline = Some(now + self.max_wait());
        }
    }

    /// Queues items for flushing without waiting for the quiet window.
    pub fn submit<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.queue.extend(items);
    }

    /// Returns the next chunk of due items, possibly empty.
    pub fn poll(&mut self, now: Instant) -> Vec<T> {
        if self.pending_due(now) {
            self.queue.extend(self.pending.drain(..));
            self.quiet_deadline = None;
            self.max_deadline = None;
        }
        let take = self.chunk_size.min(self.queue.len());
        self.queue.drain(..take).collect()
    }

    /// Drops everything buffered or queued.
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.queue.clear();
        self.quiet_deadline = None;
        self.max_deadline = None;
    }

    /// When the host should call [`poll`](Self::poll) next.
    ///
    /// `Some(now)` while chunks are queued, the earlier of the two deadlines
    /// while a batch is pending, `None` when idle.
    #[must_use]
    pub fn next_wake(&self, now: Instant) -> Option<Instant> {
        if !self.queue.is_empty() {
            return Some(now);
        }
        match (self.quiet_deadline, self.max_deadline) {
            (Some(quiet), Some(max)) => Some(quiet.min(max)),
            (deadline, None) | (None, deadline) => deadline,
        }
    }

    fn pending_due(&self, now: Instant) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.quiet_deadline.is_some_and(|d| now >= d) || self.max_deadline.is_some_and(|d| now >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_coalesces_into_one_flush() {
        let t0 = Instant::now();
        let mut sched = CoalescingScheduler::new(ms(30), 50);

        sched.push([1, 2], t0);
        sched.push([3], t0 + ms(10));
        sched.push([4, 5], t0 + ms(20));
        assert_eq!(sched.phase(), Phase::PendingBatch);

        assert!(sched.poll(t0 + ms(45)).is_empty());
        assert_eq!(sched.poll(t0 + ms(50)), vec![1, 2, 3, 4, 5]);
        assert_eq!(sched.phase(), Phase::Idle);
    }

    #[test]
    fn test_chunks_are_bounded() {
        let t0 = Instant::now();
        let mut sched = CoalescingScheduler::new(ms(30), 2);
        sched.push(0..5, t0);
        assert_eq!(sched.len(), 5);

        assert_eq!(sched.poll(t0 + ms(30)), vec![0, 1]);
        assert_eq!(sched.len(), 3);
        assert_eq!(sched.phase(), Phase::Flushing);
        assert_eq!(sched.next_wake(t0 + ms(31)), Some(t0 + ms(31)));
        assert_eq!(sched.poll(t0 + ms(31)), vec![2, 3]);
        assert_eq!(sched.poll(t0 + ms(32)), vec![4]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_continuous_stream_flushes_at_max_wait() {
        let t0 = Instant::now();
        let mut sched = CoalescingScheduler::new(ms(30), 100);
        let mut flushed = Vec::new();
        for step in 0..20u32 {
            let now = t0 + ms(u64::from(step) * 20);
            sched.push([step], now);
            flushed.extend(sched.poll(now));
        }
        // Quiet window never elapses, but max-wait (200ms) does.
        assert_eq!(flushed, (0..=10).collect::<Vec<u32>>());
        assert_eq!(sched.phase(), Phase::PendingBatch);
    }

    #[test]
    fn test_max_wait_never_below_quiet_window() {
        let sched: CoalescingScheduler<u8> = CoalescingScheduler::new(ms(500), 1);
        assert_eq!(sched.max_wait(), ms(500));
        let sched: CoalescingScheduler<u8> = CoalescingScheduler::new(ms(10), 1);
        assert_eq!(sched.max_wait(), MIN_MAX_WAIT);
    }

    #[test]
    fn test_cancel_drops_pending_and_queued() {
        let t0 = Instant::now();
        let mut sched = CoalescingScheduler::new(ms(30), 1);
        sched.submit([1, 2]);
        let chunk = sched.poll(t0);
        sched.push([3], t0);
        sched.cancel();

        assert_eq!(chunk, vec![1]);
        assert_eq!(sched.phase(), Phase::Idle);
        assert!(sched.poll(t0 + ms(1000)).is_empty());
        assert_eq!(sched.next_wake(t0), None);
    }

    #[test]
    fn test_submit_skips_quiet_window() {
        let t0 = Instant::now();
        let mut sched = CoalescingScheduler::new(ms(30), 10);
        sched.submit(["a", "b"]);
        assert_eq!(sched.poll(t0), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_push_does_not_arm_deadlines() {
        let t0 = Instant::now();
        let mut sched: CoalescingScheduler<u8> = CoalescingScheduler::new(ms(30), 10);
        sched.push(std::iter::empty(), t0);
        assert_eq!(sched.next_wake(t0), None);
        assert_eq!(sched.phase(), Phase::Idle);
    }

    #[test]
    fn test_next_wake_reports_earliest_deadline() {
        let t0 = Instant::now();
        let mut sched = CoalescingScheduler::new(ms(30), 10);
        sched.push([1], t0);
        assert_eq!(sched.next_wake(t0), Some(t0 + ms(30)));
        sched.push([2], t0 + ms(190));
        assert_eq!(sched.next_wake(t0 + ms(190)), Some(t0 + ms(200)));
    }
}
