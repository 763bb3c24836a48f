//! JSON test vector loader for percentile tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PercentileVector {
    pub description: String,
    pub samples_ms: Vec<u64>,
    pub fraction: f64,
    #[serde(default)]
    pub expect_ms: Option<u64>,
}

impl PercentileVector {
    pub fn samples(&self) -> Vec<Duration> {
        self.samples_ms.iter().map(|&ms| Duration::from_millis(ms)).collect()
    }

    pub fn expected(&self) -> Option<Duration> {
        self.expect_ms.map(Duration::from_millis)
    }
}
