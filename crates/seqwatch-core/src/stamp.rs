/// The producer-side stamping convention the tracker depends on.
///
/// A producer that wants its stream tracked stamps every published
/// message with a `sequence_number` property: decimal ASCII of a
/// non-negative, gap-free, strictly-increasing counter starting at 0.
/// An optional `sequence_tgt_max` property carries the advisory total
/// cycle count minus one, letting `close()` account for a terminal run
/// of messages that never arrive at all (see `Tracker::set_target_max`).
///
/// This module only defines the wire-level contract and a small
/// producer-side helper; absence of `sequence_number` on a message
/// simply disables tracking for that message — it is never an error.
use std::fmt::Write as _;

/// Property name carrying the sequence number. Required for tracking.
pub const SEQUENCE_NUMBER_PROPERTY: &str = "sequence_number";

/// Property name carrying the advisory maximum sequence number. Optional.
pub const SEQUENCE_TGT_MAX_PROPERTY: &str = "sequence_tgt_max";

/// Builds the property pair a producer attaches to an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerStamp {
    sequence_number: i64,
    sequence_tgt_max: Option<i64>,
}

impl ProducerStamp {
    /// Stamp for sequence number `n`. `n` must be non-negative — the
    /// producer is expected to count up from 0 with no gaps.
    pub fn new(sequence_number: i64) -> Self {
        Self {
            sequence_number,
            sequence_tgt_max: None,
        }
    }

    /// Attach the advisory total-cycle-count-minus-one hint.
    pub fn with_target_max(mut self, sequence_tgt_max: i64) -> Self {
        self.sequence_tgt_max = Some(sequence_tgt_max);
        self
    }

    /// Render as `(property name, decimal ASCII value)` pairs, ready to
    /// set on the outgoing message.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(2);
        out.push((SEQUENCE_NUMBER_PROPERTY, self.sequence_number.to_string()));
        if let Some(max) = self.sequence_tgt_max {
            let mut s = String::new();
            let _ = write!(s, "{max}");
            out.push((SEQUENCE_TGT_MAX_PROPERTY, s));
        }
        out
    }
}
