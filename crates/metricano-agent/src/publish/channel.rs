use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use metricano_core::{Metric, MetricanoError, Result};

use super::Publisher;

/// Forwards each batch into an mpsc channel for custom consumers.
pub struct ChannelPublisher {
    tx: mpsc::Sender<Vec<Metric>>,
    disposed: AtomicBool,
}

impl ChannelPublisher {
    pub fn new(tx: mpsc::Sender<Vec<Metric>>) -> Self {
        Self {
            tx,
            disposed: AtomicBool::new(false),
        }
    }

    /// Publisher plus the receiving end, with room for `capacity` batches.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Vec<Metric>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl Publisher for ChannelPublisher {
    async fn publish(&self, batch: &[Metric]) -> Result<()> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(MetricanoError::Disposed);
        }
        self.tx
            .send(batch.to_vec())
            .await
            .map_err(|_| MetricanoError::Publish("metric channel closed".into()))
    }

    async fn dispose(&self) -> Result<()> {
        self.disposed.store(true, Ordering::Release);
        Ok(())
    }
}
