//! Shared entry point wiring registry, boundaries and flushing together.
//!
//! There is no process-global agent: construct one at startup, share it by
//! `Arc`, and shut its flusher down on exit. Tests build as many as they need.

use std::sync::Arc;

use crate::boundary::{InstrumentationBoundary, Measures};
use crate::config::AgentConfig;
use crate::flush::{Flusher, FlusherHandle};
use crate::publish::Publisher;
use crate::registry::MetricRegistry;

pub struct MetricsAgent {
    cfg: AgentConfig,
    registry: Arc<MetricRegistry>,
}

impl MetricsAgent {
    pub fn new(cfg: AgentConfig) -> Self {
        let registry = Arc::new(MetricRegistry::with_reservoir_capacity(
            cfg.registry.reservoir_capacity,
        ));
        Self { cfg, registry }
    }

    pub fn cfg(&self) -> &AgentConfig {
        &self.cfg
    }

    pub fn registry(&self) -> Arc<MetricRegistry> {
        Arc::clone(&self.registry)
    }

    /// Boundary writing the given measures into this agent's registry.
    pub fn boundary(&self, measures: Measures) -> InstrumentationBoundary {
        InstrumentationBoundary::new(self.registry(), measures)
    }

    /// Flusher for `publisher` using the configured cadence, not yet started.
    pub fn flusher(&self, publisher: Arc<dyn Publisher>) -> Flusher {
        Flusher::new(self.registry(), publisher, &self.cfg.flush)
    }

    /// Start publishing to `publisher` in the background.
    ///
    /// Must be called within a Tokio runtime.
    pub fn publish_with(&self, publisher: Arc<dyn Publisher>) -> FlusherHandle {
        self.flusher(publisher).spawn()
    }
}

impl Default for MetricsAgent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}
