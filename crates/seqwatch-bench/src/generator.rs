/// Synthetic producer/consumer pair: generates a sequence number stream
/// with configurable loss, duplication, and bounded reordering, playing
/// the role of the broker client the core tracker treats as a black
/// box (spec: "out of scope — external collaborators").
use rand::Rng;

#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Number of sequence numbers the producer emits, starting at 0.
    pub count: i64,
    /// Probability a given sequence number never reaches the consumer.
    pub loss_rate: f64,
    /// Probability a delivered number is redelivered once more.
    pub duplicate_rate: f64,
    /// Size of the reordering buffer — how far ahead a number may be
    /// held before being released to the consumer.
    pub reorder_window: usize,
}

/// Produce the sequence of numbers a consumer would observe: a shuffle
/// buffer holds up to `reorder_window` produced numbers and releases a
/// random one whenever it's full, so delivery order departs from
/// production order by at most roughly `reorder_window`.
pub fn synthetic_stream(config: &StreamConfig, rng: &mut impl Rng) -> Vec<i64> {
    let mut buffer: Vec<i64> = Vec::with_capacity(config.reorder_window + 1);
    let mut observed = Vec::new();

    for n in 0..config.count {
        if rng.random::<f64>() < config.loss_rate {
            continue; // dropped before it ever reached the consumer
        }
        buffer.push(n);
        if buffer.len() > config.reorder_window {
            release_one(&mut buffer, &mut observed, config.duplicate_rate, rng);
        }
    }
    while !buffer.is_empty() {
        release_one(&mut buffer, &mut observed, config.duplicate_rate, rng);
    }

    observed
}

/// Pop a random element out of the reorder buffer and deliver it,
/// optionally delivering it a second time to simulate a duplicate.
fn release_one(buffer: &mut Vec<i64>, observed: &mut Vec<i64>, duplicate_rate: f64, rng: &mut impl Rng) {
    let idx = rng.random_range(0..buffer.len());
    let n = buffer.swap_remove(idx);
    observed.push(n);
    if rng.random::<f64>() < duplicate_rate {
        observed.push(n);
    }
}
