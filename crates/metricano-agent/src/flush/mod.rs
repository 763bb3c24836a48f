//! Periodic snapshot-and-publish.

mod flusher;

pub use flusher::{FlushStats, Flusher, FlusherHandle};
