mod events;
mod generator;
mod message;

use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use seqwatch_core::{dispatch, TrackerRegistry};

use events::{emit, EventRunSummary, EventTopicResult};
use generator::{synthetic_stream, StreamConfig};
use message::SyntheticMessage;

#[derive(Parser)]
#[command(name = "seqwatch-bench", about = "Load-generation driver for the received-message sequence tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay one synthetic topic's sequence stream through the tracker.
    Replay {
        /// Topic name the tracker is keyed on.
        #[arg(long, default_value = "orders")]
        topic: String,
        /// How many sequence numbers the producer emits.
        #[arg(long, default_value = "10000")]
        count: i64,
        /// Probability a given number never reaches the consumer.
        #[arg(long, default_value = "0.01")]
        loss_rate: f64,
        /// Probability a delivered number is redelivered once more.
        #[arg(long, default_value = "0.01")]
        duplicate_rate: f64,
        /// Size of the reordering buffer.
        #[arg(long, default_value = "20")]
        reorder_window: usize,
        /// Stamp the first message with sequence_tgt_max so close() can
        /// account for a terminal tail loss.
        #[arg(long)]
        target_max: bool,
        /// PRNG seed, for reproducible runs.
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Drive many independent topics with their own streams.
    Chaos {
        /// Number of distinct topics to simulate.
        #[arg(long, default_value = "8")]
        topics: usize,
        /// Sequence numbers emitted per topic.
        #[arg(long, default_value = "5000")]
        count: i64,
        #[arg(long, default_value = "0.02")]
        loss_rate: f64,
        #[arg(long, default_value = "0.02")]
        duplicate_rate: f64,
        #[arg(long, default_value = "30")]
        reorder_window: usize,
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Command::Replay {
            topic,
            count,
            loss_rate,
            duplicate_rate,
            reorder_window,
            target_max,
            seed,
        } => {
            let config = StreamConfig {
                count,
                loss_rate,
                duplicate_rate,
                reorder_window,
            };
            let result = run_topic(topic, &config, target_max, seed);
            print_topic_report(&result);
            emit(&result);

            emit(&EventRunSummary {
                event: "run_summary",
                topics: 1,
                total_observed: result.observed,
                out_of_seq: result.out_of_seq,
                duplicate: result.duplicate,
                loss: result.loss,
                elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
            });
        }

        Command::Chaos {
            topics,
            count,
            loss_rate,
            duplicate_rate,
            reorder_window,
            seed,
        } => {
            let config = StreamConfig {
                count,
                loss_rate,
                duplicate_rate,
                reorder_window,
            };

            let mut total_observed = 0usize;
            let mut total_out_of_seq = 0u64;
            let mut total_duplicate = 0u64;
            let mut total_loss = 0u64;

            for i in 0..topics {
                let topic = format!("topic-{i}");
                let result = run_topic(topic, &config, false, seed.wrapping_add(i as u64));
                print_topic_report(&result);
                emit(&result);

                total_observed += result.observed;
                total_out_of_seq += result.out_of_seq;
                total_duplicate += result.duplicate;
                total_loss += result.loss;
            }

            let summary = EventRunSummary {
                event: "run_summary",
                topics,
                total_observed,
                out_of_seq: total_out_of_seq,
                duplicate: total_duplicate,
                loss: total_loss,
                elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
            };
            eprintln!(
                "\n{} topics, {} observed, out_of_seq={} duplicate={} loss={} in {:.1}ms",
                summary.topics,
                summary.total_observed,
                summary.out_of_seq,
                summary.duplicate,
                summary.loss,
                summary.elapsed_ms
            );
            emit(&summary);
        }
    }

    Ok(())
}

/// Generate one topic's synthetic stream, feed it through a fresh
/// registry end to end, and return the resulting counter totals.
fn run_topic(topic: String, config: &StreamConfig, target_max: bool, seed: u64) -> EventTopicResult {
    let registry = TrackerRegistry::new();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let observed = synthetic_stream(config, &mut rng);

    for (i, &n) in observed.iter().enumerate() {
        let message = if target_max && i == 0 {
            SyntheticMessage::new(n).with_target_max(config.count - 1)
        } else {
            SyntheticMessage::new(n)
        };
        dispatch(&registry, &topic, &message).expect("topic name is non-empty");
    }
    registry.close_all();

    EventTopicResult {
        event: "topic_result",
        topic,
        produced: config.count,
        observed: observed.len(),
        out_of_seq: registry.out_of_seq().get(),
        duplicate: registry.duplicate().get(),
        loss: registry.loss().get(),
    }
}

fn print_topic_report(result: &EventTopicResult) {
    eprintln!(
        "{:<16} produced={:<8} observed={:<8} out_of_seq={:<6} duplicate={:<6} loss={:<6}",
        result.topic, result.produced, result.observed, result.out_of_seq, result.duplicate, result.loss
    );
}
