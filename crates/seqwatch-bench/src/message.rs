/// The synthetic "received message" the bench driver feeds through the
/// adapter — a minimal stand-in for a real broker SDK's message type,
/// carrying just the two properties the producer-stamp convention
/// defines.
use std::collections::HashMap;

use seqwatch_core::MessageProperties;

pub struct SyntheticMessage {
    properties: HashMap<&'static str, String>,
}

impl SyntheticMessage {
    pub fn new(sequence_number: i64) -> Self {
        let mut properties = HashMap::new();
        properties.insert(seqwatch_core::stamp::SEQUENCE_NUMBER_PROPERTY, sequence_number.to_string());
        Self { properties }
    }

    pub fn with_target_max(mut self, sequence_tgt_max: i64) -> Self {
        self.properties.insert(
            seqwatch_core::stamp::SEQUENCE_TGT_MAX_PROPERTY,
            sequence_tgt_max.to_string(),
        );
        self
    }
}

impl MessageProperties for SyntheticMessage {
    fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
