//! Metricano core: runtime-free metric primitives shared by the agent,
//! publishers, and tests.
//!
//! This crate defines the immutable metric snapshots, the nearest-rank
//! percentile estimator, call-site descriptors used to derive metric names,
//! and the error surface. It carries no runtime dependencies so custom
//! publishers can depend on it alone.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `MetricanoError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod name;
pub mod percentile;

/// Shared result type.
pub use error::{ErrorCode, MetricanoError, Result};
pub use metric::{CountMetric, DurationMetric, Metric, MetricKind};
pub use name::{simple_type_name, CallDescriptor};
pub use percentile::nearest_rank_from_top;
