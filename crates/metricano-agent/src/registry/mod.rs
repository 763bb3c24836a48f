//! Concurrent metric aggregation.
//!
//! `MetricRegistry` owns every accumulator. Call sites only ever pass metric
//! names; the flusher is the only caller of `snapshot_and_reset`.

mod accumulator;
mod map;

pub use accumulator::{CountAccumulator, DurationAccumulator, DEFAULT_RESERVOIR_CAPACITY};
pub use map::MetricRegistry;
