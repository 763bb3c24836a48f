use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use metricano_core::error::{MetricanoError, Result};

use crate::config::FlushSection;
use crate::publish::Publisher;
use crate::registry::MetricRegistry;

/// Point-in-time copy of the flusher's counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushStats {
    /// Drain attempts, including the final one on shutdown.
    pub ticks: u64,
    pub published_batches: u64,
    pub published_metrics: u64,
    /// Batches the publisher failed or timed out on.
    pub failed_batches: u64,
    /// Metrics lost with failed batches. They are never re-queued.
    pub dropped_metrics: u64,
    /// Empty drains that were not sent.
    pub skipped_batches: u64,
}

#[derive(Default)]
struct FlushCounters {
    ticks: AtomicU64,
    published_batches: AtomicU64,
    published_metrics: AtomicU64,
    failed_batches: AtomicU64,
    dropped_metrics: AtomicU64,
    skipped_batches: AtomicU64,
}

impl FlushCounters {
    fn snapshot(&self) -> FlushStats {
        FlushStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            published_batches: self.published_batches.load(Ordering::Relaxed),
            published_metrics: self.published_metrics.load(Ordering::Relaxed),
            failed_batches: self.failed_batches.load(Ordering::Relaxed),
            dropped_metrics: self.dropped_metrics.load(Ordering::Relaxed),
            skipped_batches: self.skipped_batches.load(Ordering::Relaxed),
        }
    }
}

/// Drains the registry and hands each batch to a publisher.
pub struct Flusher {
    registry: Arc<MetricRegistry>,
    publisher: Arc<dyn Publisher>,
    interval: Duration,
    publish_timeout: Duration,
    skip_empty_batches: bool,
    counters: Arc<FlushCounters>,
}

impl Flusher {
    pub fn new(registry: Arc<MetricRegistry>, publisher: Arc<dyn Publisher>, cfg: &FlushSection) -> Self {
        Self {
            registry,
            publisher,
            // tokio::time::interval rejects a zero period
            interval: cfg.interval().max(Duration::from_millis(1)),
            publish_timeout: cfg.publish_timeout(),
            skip_empty_batches: cfg.skip_empty_batches,
            counters: Arc::new(FlushCounters::default()),
        }
    }

    pub fn stats(&self) -> FlushStats {
        self.counters.snapshot()
    }

    /// Drain once and publish. Returns how many metrics were published.
    ///
    /// A failure is logged and counted before it is returned; the drained
    /// metrics are gone either way.
    pub async fn flush_now(&self) -> Result<usize> {
        self.counters.ticks.fetch_add(1, Ordering::Relaxed);

        let batch = self.registry.snapshot_and_reset();
        if batch.is_empty() && self.skip_empty_batches {
            self.counters.skipped_batches.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("flush skipped (no metrics)");
            return Ok(0);
        }

        let n = batch.len();
        let outcome = match tokio::time::timeout(self.publish_timeout, self.publisher.publish(&batch)).await {
            Ok(res) => res,
            Err(_) => Err(MetricanoError::PublishTimeout(self.publish_timeout)),
        };

        match outcome {
            Ok(()) => {
                self.counters.published_batches.fetch_add(1, Ordering::Relaxed);
                self.counters.published_metrics.fetch_add(n as u64, Ordering::Relaxed);
                tracing::debug!(metrics = n, "batch published");
                Ok(n)
            }
            Err(e) => {
                self.counters.failed_batches.fetch_add(1, Ordering::Relaxed);
                self.counters.dropped_metrics.fetch_add(n as u64, Ordering::Relaxed);
                tracing::warn!(error = %e, code = e.code().as_str(), dropped = n, "publish failed; batch dropped");
                Err(e)
            }
        }
    }

    /// Start the periodic task on the current tokio runtime.
    pub fn spawn(self) -> FlusherHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let counters = Arc::clone(&self.counters);
        let join = tokio::spawn(self.run(shutdown_rx));
        FlusherHandle {
            shutdown_tx,
            join,
            counters,
        }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; consume it so we start
        // with a full interval wait.
        ticker.tick().await;

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "flusher started");

        loop {
            tokio::select! {
                // explicit shutdown, or the handle was dropped
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    // already logged and counted
                    let _ = self.flush_now().await;
                }
            }
        }

        let _ = self.flush_now().await;
        let disposed = self.publisher.dispose().await;

        let stats = self.stats();
        tracing::info!(
            published_batches = stats.published_batches,
            failed_batches = stats.failed_batches,
            dropped_metrics = stats.dropped_metrics,
            "flusher stopped"
        );
        disposed
    }
}

/// Owner handle for a running flusher. Dropping it also stops the task.
pub struct FlusherHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<Result<()>>,
    counters: Arc<FlushCounters>,
}

impl FlusherHandle {
    pub fn stats(&self) -> FlushStats {
        self.counters.snapshot()
    }

    /// Stop ticking, flush what is left, dispose the publisher.
    ///
    /// A failed final publish shows up in the returned stats; a dispose
    /// failure is returned as the error.
    pub async fn shutdown(self) -> Result<FlushStats> {
        let _ = self.shutdown_tx.send(true);
        self.join
            .await
            .map_err(|e| MetricanoError::Internal(format!("flusher task failed: {e}")))??;
        Ok(self.counters.snapshot())
    }
}
