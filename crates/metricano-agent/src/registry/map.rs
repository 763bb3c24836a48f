use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use metricano_core::{CountMetric, DurationMetric, Metric};

use super::accumulator::{CountAccumulator, DurationAccumulator, DEFAULT_RESERVOIR_CAPACITY};

/// Name -> accumulator map, one per metric kind.
///
/// Construct once at startup and share via `Arc`. Accumulators are created
/// on first use and reset in place on every drain; names are never removed.
pub struct MetricRegistry {
    counts: DashMap<Arc<str>, CountAccumulator>,
    durations: DashMap<Arc<str>, DurationAccumulator>,
    reservoir_capacity: usize,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::with_reservoir_capacity(DEFAULT_RESERVOIR_CAPACITY)
    }

    pub fn with_reservoir_capacity(reservoir_capacity: usize) -> Self {
        Self {
            counts: DashMap::new(),
            durations: DashMap::new(),
            reservoir_capacity,
        }
    }

    pub fn reservoir_capacity(&self) -> usize {
        self.reservoir_capacity
    }

    /// Count one sample of value 1.
    pub fn increment(&self, name: &str) {
        self.increment_count(name, 1);
    }

    /// Count one sample whose value is `amount`.
    pub fn increment_count(&self, name: &str, amount: i64) {
        // fast path: existing name, shard read lock only
        if let Some(acc) = self.counts.get(name) {
            acc.increment(amount);
            return;
        }
        let acc = self.counts.entry(Arc::from(name)).or_insert_with(|| {
            tracing::debug!(metric = %name, "count accumulator created");
            CountAccumulator::new()
        });
        acc.increment(amount);
    }

    /// Record one duration sample.
    pub fn record_duration(&self, name: &str, duration: Duration) {
        if let Some(acc) = self.durations.get(name) {
            acc.record(duration);
            return;
        }
        let capacity = self.reservoir_capacity;
        let acc = self.durations.entry(Arc::from(name)).or_insert_with(|| {
            tracing::debug!(metric = %name, capacity, "duration accumulator created");
            DurationAccumulator::new(capacity)
        });
        acc.record(duration);
    }

    /// Drain every accumulator into immutable metrics and reset it.
    ///
    /// Accumulators untouched since the previous drain are left out, so two
    /// back-to-back drains yield an empty second batch. The batch is sorted
    /// by name, counts before durations.
    pub fn snapshot_and_reset(&self) -> Vec<Metric> {
        let mut batch: Vec<Metric> = Vec::new();

        for r in self.counts.iter() {
            if let Some(m) = r.value().take(r.key()) {
                batch.push(Metric::Count(m));
            }
        }
        for r in self.durations.iter() {
            if let Some(m) = r.value().take(r.key()) {
                batch.push(Metric::Duration(m));
            }
        }

        batch.sort_by(|a, b| a.name().cmp(b.name()).then(a.kind().cmp(&b.kind())));
        batch
    }

    /// Current count statistics without resetting.
    pub fn peek_count(&self, name: &str) -> Option<CountMetric> {
        self.counts.get(name).and_then(|r| r.value().peek(name))
    }

    /// Current duration statistics without resetting.
    pub fn peek_duration(&self, name: &str) -> Option<DurationMetric> {
        self.durations.get(name).and_then(|r| r.value().peek(name))
    }

    /// Number of registered accumulators across both kinds.
    pub fn len(&self) -> usize {
        self.counts.len() + self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every registered name, sorted and deduplicated.
    pub fn metric_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .counts
            .iter()
            .map(|r| r.key().to_string())
            .chain(self.durations.iter().map(|r| r.key().to_string()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
