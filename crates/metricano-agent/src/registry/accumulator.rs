//! Per-name running statistics.
//!
//! Each accumulator guards its state with its own mutex. Every update and
//! every drain is one short critical section, so an update lands either in
//! the drained snapshot or in the next one, never both.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use metricano_core::{CountMetric, DurationMetric};

/// Default number of raw duration samples retained per metric.
pub const DEFAULT_RESERVOIR_CAPACITY: usize = 1024;

// State is consistent between statements, so a poisoned lock is still usable.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default, Clone, Copy)]
struct CountState {
    sum: i64,
    min: i64,
    max: i64,
    sample_count: u64,
}

/// Running count statistics. One `increment` is one sample.
#[derive(Debug, Default)]
pub struct CountAccumulator {
    state: Mutex<CountState>,
}

impl CountAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, amount: i64) {
        let mut st = lock(&self.state);
        if st.sample_count == 0 {
            st.min = amount;
            st.max = amount;
        } else {
            st.min = st.min.min(amount);
            st.max = st.max.max(amount);
        }
        st.sum = st.sum.saturating_add(amount);
        st.sample_count += 1;
    }

    /// Snapshot without resetting. `None` if nothing was recorded.
    pub fn peek(&self, name: &str) -> Option<CountMetric> {
        let st = *lock(&self.state);
        to_count_metric(name, st)
    }

    /// Snapshot and reset in one critical section.
    pub fn take(&self, name: &str) -> Option<CountMetric> {
        let st = std::mem::take(&mut *lock(&self.state));
        to_count_metric(name, st)
    }
}

fn to_count_metric(name: &str, st: CountState) -> Option<CountMetric> {
    if st.sample_count == 0 {
        return None;
    }
    Some(CountMetric::new(name, st.sum, st.min, st.max, st.sample_count))
}

#[derive(Debug)]
struct DurationState {
    sum: Duration,
    min: Duration,
    max: Duration,
    sample_count: u64,
    reservoir: VecDeque<Duration>,
}

impl DurationState {
    fn empty(capacity: usize) -> Self {
        Self {
            sum: Duration::ZERO,
            min: Duration::ZERO,
            max: Duration::ZERO,
            sample_count: 0,
            reservoir: VecDeque::with_capacity(capacity.min(DEFAULT_RESERVOIR_CAPACITY)),
        }
    }
}

/// Running duration statistics plus a bounded ring of raw samples.
#[derive(Debug)]
pub struct DurationAccumulator {
    capacity: usize,
    state: Mutex<DurationState>,
}

impl DurationAccumulator {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(DurationState::empty(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, duration: Duration) {
        let mut st = lock(&self.state);
        if st.sample_count == 0 {
            st.min = duration;
            st.max = duration;
        } else {
            st.min = st.min.min(duration);
            st.max = st.max.max(duration);
        }
        st.sum = st.sum.saturating_add(duration);
        st.sample_count += 1;

        if self.capacity == 0 {
            return;
        }
        // Ring buffer: O(1) eviction of the oldest sample.
        if st.reservoir.len() >= self.capacity {
            st.reservoir.pop_front();
        }
        st.reservoir.push_back(duration);
    }

    /// Snapshot without resetting. `None` if nothing was recorded.
    pub fn peek(&self, name: &str) -> Option<DurationMetric> {
        let st = lock(&self.state);
        if st.sample_count == 0 {
            return None;
        }
        Some(DurationMetric::new(
            name,
            st.sum,
            st.min,
            st.max,
            st.sample_count,
            st.reservoir.iter().copied().collect(),
        ))
    }

    /// Snapshot and reset in one critical section.
    pub fn take(&self, name: &str) -> Option<DurationMetric> {
        let st = {
            let mut guard = lock(&self.state);
            if guard.sample_count == 0 {
                return None;
            }
            std::mem::replace(&mut *guard, DurationState::empty(self.capacity))
        };
        Some(DurationMetric::new(
            name,
            st.sum,
            st.min,
            st.max,
            st.sample_count,
            Vec::from(st.reservoir),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_tracks_signed_amounts() {
        let acc = CountAccumulator::new();
        acc.increment(5);
        acc.increment(-3);
        acc.increment(1);
        let m = acc.take("c").unwrap();
        assert_eq!((m.sum(), m.min(), m.max(), m.sample_count()), (3, -3, 5, 3));
        assert!(acc.take("c").is_none());
    }

    #[test]
    fn reservoir_evicts_oldest() {
        let acc = DurationAccumulator::new(3);
        for ms in 1..=5 {
            acc.record(Duration::from_millis(ms));
        }
        let m = acc.take("d").unwrap();
        assert_eq!(m.sample_count(), 5);
        assert_eq!(m.sum(), Duration::from_millis(15));
        assert_eq!(
            m.raw_samples(),
            &[Duration::from_millis(3), Duration::from_millis(4), Duration::from_millis(5)]
        );
    }

    #[test]
    fn zero_capacity_keeps_stats_only() {
        let acc = DurationAccumulator::new(0);
        acc.record(Duration::from_millis(7));
        let m = acc.peek("d").unwrap();
        assert_eq!(m.max(), Duration::from_millis(7));
        assert!(m.raw_samples().is_empty());
        assert_eq!(m.p95(), None);
    }
}
