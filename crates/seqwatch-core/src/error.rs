/// Errors surfaced at the adapter boundary.
///
/// The tracker itself never fails (spec: all abnormal input is a
/// classification, not an error) — this enum exists only for conditions
/// that are exceptional regardless of the sequence stream, such as a
/// caller passing an empty topic name.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("topic name must not be empty")]
    EmptyTopic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_empty_topic() {
        let err = AdapterError::EmptyTopic;
        assert_eq!(err.to_string(), "topic name must not be empty");
    }
}
