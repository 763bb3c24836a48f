use std::time::Duration;

use serde::Deserialize;
use metricano_core::error::{MetricanoError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    #[serde(default)]
    pub flush: FlushSection,

    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub log: LogSection,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: 1,
            flush: FlushSection::default(),
            registry: RegistrySection::default(),
            log: LogSection::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricanoError::UnsupportedVersion);
        }

        self.flush.validate()?;
        self.registry.validate()?;
        self.log.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlushSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_publish_timeout_ms")]
    pub publish_timeout_ms: u64,

    #[serde(default = "default_skip_empty_batches")]
    pub skip_empty_batches: bool,
}

impl Default for FlushSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            publish_timeout_ms: default_publish_timeout_ms(),
            skip_empty_batches: default_skip_empty_batches(),
        }
    }
}

impl FlushSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=3_600_000).contains(&self.interval_ms) {
            return Err(MetricanoError::InvalidConfig(
                "flush.interval_ms must be between 100 and 3600000".into(),
            ));
        }
        if self.publish_timeout_ms == 0 || self.publish_timeout_ms > self.interval_ms {
            return Err(MetricanoError::InvalidConfig(
                "flush.publish_timeout_ms must be between 1 and flush.interval_ms".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }
}

fn default_interval_ms() -> u64 {
    60_000
}
fn default_publish_timeout_ms() -> u64 {
    10_000
}
fn default_skip_empty_batches() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    #[serde(default = "default_reservoir_capacity")]
    pub reservoir_capacity: usize,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            reservoir_capacity: default_reservoir_capacity(),
        }
    }
}

impl RegistrySection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1_000_000).contains(&self.reservoir_capacity) {
            return Err(MetricanoError::InvalidConfig(
                "registry.reservoir_capacity must be between 1 and 1000000".into(),
            ));
        }
        Ok(())
    }
}

fn default_reservoir_capacity() -> usize {
    crate::registry::DEFAULT_RESERVOIR_CAPACITY
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Counted from the top: 0.05 reports p95.
    #[serde(default = "default_percentile_fraction")]
    pub percentile_fraction: f64,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            percentile_fraction: default_percentile_fraction(),
        }
    }
}

impl LogSection {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.percentile_fraction) {
            return Err(MetricanoError::InvalidConfig(
                "log.percentile_fraction must be in [0, 1)".into(),
            ));
        }
        Ok(())
    }
}

fn default_percentile_fraction() -> f64 {
    0.05
}
