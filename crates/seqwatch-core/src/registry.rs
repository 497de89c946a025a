/// Maps topic name to tracker, one per topic per consumer.
///
/// Lookup lazily creates a tracker on first use. Creation is guarded by
/// a mutex; mutation of an individual tracker is not — the caller must
/// ensure each topic's tracker is only ever driven from the consumer
/// thread that owns that topic's reception (see `tracker` module docs).
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use seqwatch_metrics::Counter;

use crate::tracker::Tracker;

pub struct TrackerRegistry {
    out_of_seq: Arc<Counter>,
    duplicate: Arc<Counter>,
    loss: Arc<Counter>,
    trackers: Mutex<HashMap<String, Arc<Mutex<Tracker>>>>,
}

impl TrackerRegistry {
    /// Create a registry with its own fresh set of counters.
    pub fn new() -> Self {
        Self::with_counters(
            Arc::new(Counter::new()),
            Arc::new(Counter::new()),
            Arc::new(Counter::new()),
        )
    }

    /// Create a registry reporting into externally-owned counter
    /// handles (e.g. ones already registered with a metric reporter).
    pub fn with_counters(
        out_of_seq: Arc<Counter>,
        duplicate: Arc<Counter>,
        loss: Arc<Counter>,
    ) -> Self {
        Self {
            out_of_seq,
            duplicate,
            loss,
            trackers: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the tracker for `topic`, creating it (with a clone of this
    /// registry's counter handles) on first observation.
    pub fn tracker_for(&self, topic: &str) -> Arc<Mutex<Tracker>> {
        let mut trackers = self.trackers.lock().expect("tracker registry mutex poisoned");
        trackers
            .entry(topic.to_string())
            .or_insert_with(|| {
                tracing::debug!(topic, "creating tracker for new topic");
                Arc::new(Mutex::new(Tracker::new(
                    self.out_of_seq.clone(),
                    self.duplicate.clone(),
                    self.loss.clone(),
                )))
            })
            .clone()
    }

    /// Invoke `close()` on every tracker created so far, in unspecified
    /// order.
    pub fn close_all(&self) {
        let trackers = self.trackers.lock().expect("tracker registry mutex poisoned");
        for (topic, tracker) in trackers.iter() {
            tracing::debug!(topic, "closing tracker");
            tracker.lock().expect("tracker mutex poisoned").close();
        }
    }

    /// Number of topics this registry has created a tracker for.
    pub fn topic_count(&self) -> usize {
        self.trackers.lock().expect("tracker registry mutex poisoned").len()
    }

    /// The shared out-of-seq counter, for metric reporters.
    pub fn out_of_seq(&self) -> &Arc<Counter> {
        &self.out_of_seq
    }

    /// The shared duplicate counter, for metric reporters.
    pub fn duplicate(&self) -> &Arc<Counter> {
        &self.duplicate
    }

    /// The shared loss counter, for metric reporters.
    pub fn loss(&self) -> &Arc<Counter> {
        &self.loss
    }
}

impl Default for TrackerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
