//! Immutable metric snapshots.
//!
//! A [`Metric`] is produced when the registry drains an accumulator and is
//! never mutated afterwards. Publishers receive them as `&[Metric]`.

use std::sync::Arc;
use std::time::Duration;

use crate::percentile::nearest_rank_from_top;

/// Which kind of accumulator a metric came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKind {
    Count,
    Duration,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Count => "count",
            MetricKind::Duration => "duration",
        }
    }
}

/// Snapshot of a count accumulator.
///
/// Every `increment` call is one sample; its amount is the sample value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMetric {
    name: Arc<str>,
    sum: i64,
    min: i64,
    max: i64,
    sample_count: u64,
}

impl CountMetric {
    pub fn new(name: impl Into<Arc<str>>, sum: i64, min: i64, max: i64, sample_count: u64) -> Self {
        Self {
            name: name.into(),
            sum,
            min,
            max,
            sample_count,
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn sum(&self) -> i64 { self.sum }
    pub fn min(&self) -> i64 { self.min }
    pub fn max(&self) -> i64 { self.max }
    pub fn sample_count(&self) -> u64 { self.sample_count }

    /// Mean sample value; `None` when no samples were recorded.
    pub fn average(&self) -> Option<f64> {
        if self.sample_count == 0 {
            return None;
        }
        Some(self.sum as f64 / self.sample_count as f64)
    }
}

/// Snapshot of a duration accumulator, including the retained reservoir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationMetric {
    name: Arc<str>,
    sum: Duration,
    min: Duration,
    max: Duration,
    sample_count: u64,
    raw_samples: Vec<Duration>,
}

impl DurationMetric {
    pub fn new(
        name: impl Into<Arc<str>>,
        sum: Duration,
        min: Duration,
        max: Duration,
        sample_count: u64,
        raw_samples: Vec<Duration>,
    ) -> Self {
        Self {
            name: name.into(),
            sum,
            min,
            max,
            sample_count,
            raw_samples,
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn sum(&self) -> Duration { self.sum }
    pub fn min(&self) -> Duration { self.min }
    pub fn max(&self) -> Duration { self.max }
    pub fn sample_count(&self) -> u64 { self.sample_count }

    /// Retained samples. May be shorter than `sample_count` once the
    /// reservoir has overflowed.
    pub fn raw_samples(&self) -> &[Duration] {
        &self.raw_samples
    }

    /// Mean duration; `None` when no samples were recorded.
    pub fn average(&self) -> Option<Duration> {
        if self.sample_count == 0 {
            return None;
        }
        let nanos = self.sum.as_nanos() / u128::from(self.sample_count);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    /// Nearest-rank percentile counted from the top, e.g. `0.05` for p95.
    /// `None` means undefined, which is distinct from a zero duration.
    pub fn percentile(&self, fraction: f64) -> Option<Duration> {
        nearest_rank_from_top(&self.raw_samples, fraction)
    }

    /// Shorthand for `percentile(0.05)`.
    pub fn p95(&self) -> Option<Duration> {
        self.percentile(0.05)
    }
}

/// Immutable metric produced by a registry drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    Count(CountMetric),
    Duration(DurationMetric),
}

impl Metric {
    pub fn name(&self) -> &str {
        match self {
            Metric::Count(m) => m.name(),
            Metric::Duration(m) => m.name(),
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Count(_) => MetricKind::Count,
            Metric::Duration(_) => MetricKind::Duration,
        }
    }

    pub fn sample_count(&self) -> u64 {
        match self {
            Metric::Count(m) => m.sample_count(),
            Metric::Duration(m) => m.sample_count(),
        }
    }

    pub fn as_count(&self) -> Option<&CountMetric> {
        match self {
            Metric::Count(m) => Some(m),
            Metric::Duration(_) => None,
        }
    }

    pub fn as_duration(&self) -> Option<&DurationMetric> {
        match self {
            Metric::Duration(m) => Some(m),
            Metric::Count(_) => None,
        }
    }
}

impl From<CountMetric> for Metric {
    fn from(m: CountMetric) -> Self {
        Metric::Count(m)
    }
}

impl From<DurationMetric> for Metric {
    fn from(m: DurationMetric) -> Self {
        Metric::Duration(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_average_and_percentile() {
        let samples: Vec<Duration> = (1..=4).map(|i| Duration::from_millis(i * 10)).collect();
        let m = DurationMetric::new(
            "op",
            Duration::from_millis(100),
            Duration::from_millis(10),
            Duration::from_millis(40),
            4,
            samples,
        );
        assert_eq!(m.average(), Some(Duration::from_millis(25)));
        assert_eq!(m.p95(), Some(Duration::from_millis(40)));
    }

    #[test]
    fn empty_metrics_have_no_average() {
        assert_eq!(CountMetric::new("c", 0, 0, 0, 0).average(), None);
        let d = DurationMetric::new("d", Duration::ZERO, Duration::ZERO, Duration::ZERO, 0, vec![]);
        assert_eq!(d.average(), None);
        assert_eq!(d.p95(), None);
    }
}
