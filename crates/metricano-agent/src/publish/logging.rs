use async_trait::async_trait;

use metricano_core::{Metric, Result};

use super::Publisher;

/// Writes every metric as a structured `tracing` event.
pub struct LogPublisher {
    percentile_fraction: f64,
}

impl LogPublisher {
    /// `percentile_fraction` is counted from the top (`0.05` for p95).
    pub fn new(percentile_fraction: f64) -> Self {
        Self { percentile_fraction }
    }

    fn emit(&self, metric: &Metric) {
        match metric {
            Metric::Count(m) => {
                tracing::info!(
                    metric = %m.name(),
                    kind = "count",
                    max = m.max(),
                    min = m.min(),
                    average = m.average().unwrap_or_default(),
                    total = m.sum(),
                    sample_count = m.sample_count(),
                    "count metric"
                );
            }
            Metric::Duration(m) => {
                // absent percentile stays absent, not 0ms
                let percentile_ms = m
                    .percentile(self.percentile_fraction)
                    .map(|d| d.as_secs_f64() * 1000.0);
                tracing::info!(
                    metric = %m.name(),
                    kind = "duration",
                    max_ms = m.max().as_secs_f64() * 1000.0,
                    min_ms = m.min().as_secs_f64() * 1000.0,
                    average_ms = m.average().unwrap_or_default().as_secs_f64() * 1000.0,
                    total_ms = m.sum().as_secs_f64() * 1000.0,
                    sample_count = m.sample_count(),
                    percentile_ms = ?percentile_ms,
                    "duration metric"
                );
            }
        }
    }
}

impl Default for LogPublisher {
    fn default() -> Self {
        Self::new(0.05)
    }
}

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, batch: &[Metric]) -> Result<()> {
        for metric in batch {
            self.emit(metric);
        }
        Ok(())
    }

    async fn dispose(&self) -> Result<()> {
        tracing::info!("log publisher disposed");
        Ok(())
    }
}
