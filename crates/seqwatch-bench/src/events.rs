/// JSONL event emission for the bench driver — one self-describing
/// object per line on stdout, suitable for piping into a log collector.
use serde::Serialize;
use std::io::Write;

pub fn emit<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        let _ = writeln!(lock, "{json}");
        let _ = lock.flush();
    }
}

#[derive(Serialize)]
pub struct EventTopicResult {
    pub event: &'static str,
    pub topic: String,
    pub produced: i64,
    pub observed: usize,
    pub out_of_seq: u64,
    pub duplicate: u64,
    pub loss: u64,
}

#[derive(Serialize)]
pub struct EventRunSummary {
    pub event: &'static str,
    pub topics: usize,
    pub total_observed: usize,
    pub out_of_seq: u64,
    pub duplicate: u64,
    pub loss: u64,
    pub elapsed_ms: f64,
}
