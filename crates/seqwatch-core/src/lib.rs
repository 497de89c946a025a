//! Received Message Sequence Tracker.
//!
//! Consumes a stream of per-message sequence numbers observed by a
//! messaging consumer and classifies it into three disjoint error
//! categories — loss, duplication, and out-of-order delivery — while
//! tolerating bounded reordering via a sliding window.
//!
//! - [`tracker::Tracker`] — the per-topic classifier; the whole
//!   non-trivial invariant of this crate lives here.
//! - [`registry::TrackerRegistry`] — owns one tracker per topic and the
//!   three shared counter handles they report into.
//! - [`stamp`] — the producer-side property convention the tracker
//!   depends on.
//! - [`adapter`] — the seam where a broker-specific message type is
//!   translated into a `(topic, sequence_number)` pair.

pub mod adapter;
pub mod error;
pub mod registry;
pub mod stamp;
pub mod tracker;

pub use adapter::{dispatch, MessageProperties};
pub use error::AdapterError;
pub use registry::TrackerRegistry;
pub use stamp::ProducerStamp;
pub use tracker::{Tracker, MAX_TRACK_OUT_OF_ORDER};
