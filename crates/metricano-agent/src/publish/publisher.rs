use async_trait::async_trait;

use metricano_core::{Metric, Result};

/// Sink for drained metric batches.
///
/// `publish` receives an immutable snapshot, so it may run while the next
/// window is already being aggregated. A failed publish only affects that
/// batch.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, batch: &[Metric]) -> Result<()>;

    /// Orderly shutdown, called once after the final flush.
    async fn dispose(&self) -> Result<()> {
        Ok(())
    }
}
