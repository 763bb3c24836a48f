//! Metricano agent library entry.
//!
//! This crate wires the metric registry, the instrumentation boundary, the
//! background flusher and the publisher contract into one agent. It is
//! consumed by the demo binary (`main.rs`), by the facade crate, and by
//! integration tests.

pub mod agent;
pub mod boundary;
pub mod config;
pub mod flush;
pub mod publish;
pub mod registry;

pub use agent::MetricsAgent;
