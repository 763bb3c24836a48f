//! Top-level facade crate for Metricano.
//!
//! Re-exports core types and the agent library so users can depend on a single crate.

pub mod core {
    pub use metricano_core::*;
}

pub mod agent {
    pub use metricano_agent::*;
}
