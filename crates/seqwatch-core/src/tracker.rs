/// Per-topic sequence stream classifier.
///
/// Pure logic, no I/O. The caller feeds observed sequence numbers in
/// whatever order the broker delivered them; the tracker bridges bounded
/// reordering with a sliding window and reports loss, duplication, and
/// out-of-order delivery through three counter handles.
///
/// Single-threaded by design: the owning consumer thread is the only
/// caller. No suspension points, no locking inside the tracker itself —
/// see `registry` for how multiple trackers are shared across topics.
use std::collections::BTreeSet;
use std::sync::Arc;

use seqwatch_metrics::Counter;

/// Maximum reordering distance the tracker can bridge before declaring
/// loss. Bounds memory: the pending window never holds more than this
/// many sequence numbers.
pub const MAX_TRACK_OUT_OF_ORDER: usize = 1000;

/// Sliding-window classifier for one topic's received sequence stream.
///
/// `expected_next` is the highest sequence number confirmed in order
/// (`-1` means nothing has been confirmed yet). `pending` holds numbers
/// seen ahead of `expected_next + 1`, sorted ascending, capped at
/// [`MAX_TRACK_OUT_OF_ORDER`].
pub struct Tracker {
    expected_next: i64,
    pending: BTreeSet<i64>,
    target_max: Option<i64>,
    out_of_seq: Arc<Counter>,
    duplicate: Arc<Counter>,
    loss: Arc<Counter>,
}

impl Tracker {
    /// Construct a tracker reporting into the given counter handles.
    pub fn new(out_of_seq: Arc<Counter>, duplicate: Arc<Counter>, loss: Arc<Counter>) -> Self {
        Self {
            expected_next: -1,
            pending: BTreeSet::new(),
            target_max: None,
            out_of_seq,
            duplicate,
            loss,
        }
    }

    /// Set the advisory `sequence_tgt_max` bound, used by `close()` to
    /// account for a terminal run of messages that never arrived at all.
    /// Builder form, for construction sites that already know the bound.
    pub fn with_target_max(mut self, target_max: i64) -> Self {
        self.target_max = Some(target_max);
        self
    }

    /// Set or update the advisory target-max bound after construction —
    /// the adapter calls this when it observes `sequence_tgt_max` on a
    /// message, which may arrive after the tracker was first created.
    pub fn set_target_max(&mut self, target_max: i64) {
        self.target_max = Some(target_max);
    }

    /// Current value of the `expected_next` frontier. Exposed for tests
    /// and diagnostics; not part of the classification contract.
    pub fn expected_next(&self) -> i64 {
        self.expected_next
    }

    /// Number of sequence numbers currently parked in the reordering
    /// window.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Feed one observed sequence number.
    ///
    /// Exactly one of the three counters advances, or `expected_next`
    /// advances, or `n` is parked in the window — never more than one
    /// outcome per call.
    pub fn sequence_number_received(&mut self, n: i64) {
        if self.expected_next == -1 {
            // First observation: treat n as the baseline, so it becomes
            // the first in-order advance below.
            self.expected_next = n - 1;
        }

        let expected = self.expected_next;

        if n == expected {
            tracing::trace!(n, expected, "duplicate: re-observed confirmed frontier");
            self.duplicate.inc();
        } else if self.pending.contains(&n) {
            tracing::trace!(n, "duplicate: already parked in window");
            self.duplicate.inc();
        } else if n < expected {
            tracing::debug!(n, expected, "out-of-seq: arrived after its slot was lost");
            self.out_of_seq.inc();
        } else if n == expected + 1 {
            self.advance_from(n);
        } else {
            self.pending.insert(n);
            tracing::trace!(n, window = self.pending.len(), "parked ahead-of-order");
            self.flush_overflow();
        }
    }

    /// Finalize the tracker: flush the window, inferring loss for every
    /// gap still outstanding between the frontier and the highest
    /// pending (or advisory target-max) bound. Idempotent — calling this
    /// a second time flushes an already-empty window, a no-op.
    pub fn close(&mut self) {
        let highest_pending = self.pending.iter().next_back().copied();
        let mut bound = highest_pending.unwrap_or(self.expected_next);
        if let Some(target_max) = self.target_max {
            if target_max > bound {
                bound = target_max;
            }
        }

        let mut k = self.expected_next + 1;
        let mut flushed = 0u64;
        while k <= bound {
            if !self.pending.contains(&k) {
                self.loss.inc();
                flushed += 1;
            }
            k += 1;
        }
        if flushed > 0 {
            tracing::debug!(flushed, bound, "close: flushed window losses");
        }

        self.pending.clear();
        self.expected_next = bound;
    }

    /// Advance `expected_next` to `n`, then keep consuming consecutive
    /// successors already parked in `pending`.
    fn advance_from(&mut self, n: i64) {
        self.expected_next = n;
        while let Some(&smallest) = self.pending.iter().next() {
            if smallest == self.expected_next + 1 {
                self.expected_next = smallest;
                self.pending.remove(&smallest);
            } else {
                break;
            }
        }
    }

    /// While the window exceeds its cap, declare the oldest pending
    /// number's predecessors lost and advance the frontier past it.
    fn flush_overflow(&mut self) {
        while self.pending.len() > MAX_TRACK_OUT_OF_ORDER {
            let m = *self
                .pending
                .iter()
                .next()
                .expect("pending non-empty: len > MAX_TRACK_OUT_OF_ORDER >= 0");
            let gap = m - (self.expected_next + 1);
            debug_assert!(gap >= 0, "window overflow gap must be non-negative");
            self.loss.inc_by(gap as u64);
            tracing::debug!(m, gap, "window overflow: declaring loss");
            self.pending.remove(&m);
            self.advance_from(m);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counters {
        out_of_seq: Arc<Counter>,
        duplicate: Arc<Counter>,
        loss: Arc<Counter>,
    }

    impl Counters {
        fn new() -> Self {
            Self {
                out_of_seq: Arc::new(Counter::new()),
                duplicate: Arc::new(Counter::new()),
                loss: Arc::new(Counter::new()),
            }
        }

        fn tracker(&self) -> Tracker {
            Tracker::new(
                self.out_of_seq.clone(),
                self.duplicate.clone(),
                self.loss.clone(),
            )
        }

        fn values(&self) -> (u64, u64, u64) {
            (
                self.out_of_seq.get(),
                self.duplicate.get(),
                self.loss.get(),
            )
        }
    }

    // S1 — no gaps.
    #[test]
    fn s1_no_gaps() {
        let c = Counters::new();
        let mut t = c.tracker();
        for n in 0..100 {
            t.sequence_number_received(n);
        }
        t.close();
        assert_eq!(c.values(), (0, 0, 0));
    }

    // S2 — every odd lost.
    #[test]
    fn s2_every_odd_lost() {
        for &k in &[5i64, 10, 50] {
            let c = Counters::new();
            let mut t = c.tracker();
            let mut n = 0;
            while n <= 2 * k {
                t.sequence_number_received(n);
                n += 2;
            }
            t.close();
            let (out_of_seq, duplicate, loss) = c.values();
            assert_eq!(out_of_seq, 0);
            assert_eq!(duplicate, 0);
            assert_eq!(loss, k as u64);
        }
    }

    #[test]
    fn s2_concrete_six_odds() {
        let c = Counters::new();
        let mut t = c.tracker();
        for n in [0, 2, 4, 6, 8, 10] {
            t.sequence_number_received(n);
        }
        t.close();
        assert_eq!(c.values(), (0, 0, 5));
    }

    // S3 — every odd duplicated.
    #[test]
    fn s3_every_odd_duplicated() {
        let c = Counters::new();
        let mut t = c.tracker();
        let mut expected_duplicates = 0u64;
        let k = 50;
        let mut n = 0;
        while n < 2 * k {
            t.sequence_number_received(n);
            if n % 2 == 1 {
                t.sequence_number_received(n);
                expected_duplicates += 1;
            }
            n += 1;
        }
        t.close();
        let (out_of_seq, duplicate, loss) = c.values();
        assert_eq!(out_of_seq, 0);
        assert_eq!(loss, 0);
        assert_eq!(duplicate, expected_duplicates);
    }

    // S4 — single swap: window reassembles with no counter movement.
    #[test]
    fn s4_single_swap() {
        let c = Counters::new();
        let mut t = c.tracker();
        for n in 0..=10 {
            t.sequence_number_received(n);
        }
        t.sequence_number_received(12);
        t.sequence_number_received(11);
        for n in 13..100 {
            t.sequence_number_received(n);
        }
        t.close();
        assert_eq!(c.values(), (0, 0, 0));
    }

    // S5 — multiple reorder, still within the window: resolves cleanly
    // under the windowed semantics this tracker implements (see
    // DESIGN.md O1 — we do not count a within-window reorder as
    // out-of-seq just because a smaller number arrived after a larger
    // one).
    #[test]
    fn s5_multiple_reorder_resolves_within_window() {
        let c = Counters::new();
        let mut t = c.tracker();
        for n in 0..=10 {
            t.sequence_number_received(n);
        }
        for n in [14, 13, 11, 12] {
            t.sequence_number_received(n);
        }
        for n in 15..100 {
            t.sequence_number_received(n);
        }
        t.close();
        assert_eq!(c.values(), (0, 0, 0));
    }

    // S6 — window overflow: the lone gap at slot 1 is declared lost once
    // the window caps out.
    #[test]
    fn s6_window_overflow() {
        let c = Counters::new();
        let mut t = c.tracker();
        t.sequence_number_received(0);
        for n in 2..=(2 + MAX_TRACK_OUT_OF_ORDER as i64) {
            t.sequence_number_received(n);
        }
        t.close();
        assert_eq!(c.values(), (0, 0, 1));
    }

    #[test]
    fn duplicate_many_times() {
        let c = Counters::new();
        let mut t = c.tracker();
        t.sequence_number_received(0);
        for _ in 0..5 {
            t.sequence_number_received(0);
        }
        t.close();
        assert_eq!(c.values(), (0, 5, 0));
    }

    #[test]
    fn close_is_idempotent() {
        let c = Counters::new();
        let mut t = c.tracker();
        t.sequence_number_received(0);
        t.sequence_number_received(5);
        t.close();
        let first = c.values();
        t.close();
        assert_eq!(c.values(), first);
    }

    #[test]
    fn close_flushes_pending_gaps() {
        let c = Counters::new();
        let mut t = c.tracker();
        t.sequence_number_received(0);
        t.sequence_number_received(5);
        // gap at 1,2,3,4 still outstanding
        t.close();
        assert_eq!(c.values(), (0, 0, 4));
        assert_eq!(t.expected_next(), 5);
    }

    #[test]
    fn target_max_extends_close_out() {
        let c = Counters::new();
        let mut t = c.tracker().with_target_max(9);
        t.sequence_number_received(0);
        t.sequence_number_received(1);
        // nothing else ever arrives — slots 2..=9 are a terminal tail loss
        t.close();
        assert_eq!(c.values(), (0, 0, 8));
    }

    #[test]
    fn window_stays_within_cap() {
        let c = Counters::new();
        let mut t = c.tracker();
        t.sequence_number_received(0);
        for n in 2..=(1 + MAX_TRACK_OUT_OF_ORDER as i64) {
            t.sequence_number_received(n);
            assert!(t.pending_len() <= MAX_TRACK_OUT_OF_ORDER);
        }
    }

    #[test]
    fn strictly_behind_after_loss_is_out_of_seq() {
        let c = Counters::new();
        let mut t = c.tracker();
        t.sequence_number_received(0);
        // force window overflow, declaring slot 1 lost and advancing past it
        for n in 2..=(2 + MAX_TRACK_OUT_OF_ORDER as i64) {
            t.sequence_number_received(n);
        }
        // a late arrival for the already-declared-lost slot 1
        t.sequence_number_received(1);
        t.close();
        let (out_of_seq, _, loss) = c.values();
        assert_eq!(out_of_seq, 1);
        assert_eq!(loss, 1);
    }
}
