/// The only point where broker-specific message types touch the core.
///
/// `dispatch` reads the `sequence_number` property off a received
/// message and feeds it to the topic's tracker. Parsing failures (the
/// property is absent, non-numeric, or negative) are treated as "this
/// message is not tracked" — never as an error; the message is still
/// acknowledged normally by the caller.
use crate::error::AdapterError;
use crate::registry::TrackerRegistry;
use crate::stamp::{SEQUENCE_NUMBER_PROPERTY, SEQUENCE_TGT_MAX_PROPERTY};

/// Abstracts over a broker message's string-keyed property bag, so the
/// core never depends on any particular broker SDK's message type.
pub trait MessageProperties {
    /// Look up a property by name. `None` if absent.
    fn get(&self, key: &str) -> Option<&str>;
}

/// Extract `(topic, sequence_number)` from a received message and feed
/// it to the owning tracker, creating one lazily if this is the first
/// message seen for `topic`.
///
/// Returns `Ok(())` whether or not the message carried a trackable
/// sequence number — absence or a malformed value simply skips
/// tracking for that message. `Err` is reserved for caller misuse
/// (an empty topic name).
pub fn dispatch(
    registry: &TrackerRegistry,
    topic: &str,
    props: &impl MessageProperties,
) -> Result<(), AdapterError> {
    if topic.is_empty() {
        return Err(AdapterError::EmptyTopic);
    }

    let Some(raw) = props.get(SEQUENCE_NUMBER_PROPERTY) else {
        return Ok(());
    };
    let Ok(n) = raw.parse::<i64>() else {
        tracing::trace!(topic, raw, "non-numeric sequence_number, skipping");
        return Ok(());
    };
    if n < 0 {
        tracing::trace!(topic, n, "negative sequence_number, skipping");
        return Ok(());
    }

    let tracker = registry.tracker_for(topic);
    let mut tracker = tracker.lock().expect("tracker mutex poisoned");

    if let Some(raw_max) = props.get(SEQUENCE_TGT_MAX_PROPERTY) {
        if let Ok(max) = raw_max.parse::<i64>() {
            if max >= 0 {
                tracker.set_target_max(max);
            }
        }
    }

    tracker.sequence_number_received(n);
    Ok(())
}
