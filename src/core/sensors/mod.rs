//! Hardware sensor providers.
//!
//! Each metric is backed by a [`SensorProvider`]: an ordered list of
//! acquisition strategies tried in sequence. The first strategy that yields a
//! value wins; if all of them fail the provider reports
//! [`SensorReading::Unavailable`]. Strategy errors are logged and swallowed
//! here and never reach the caller.

pub mod battery;
pub mod identity;
pub mod ram;
pub mod temperature;

use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use crate::core::config::Config;
use crate::core::telemetry::{BatteryStatus, HardwareIdentity, SensorReading};
use crate::error::Result;

/// One way of acquiring a metric
pub struct Strategy<T> {
    pub name: &'static str,
    probe: Box<dyn Fn(&ProbeContext) -> Result<T>>,
}

impl<T> Strategy<T> {
    pub fn new<F>(name: &'static str, probe: F) -> Self
    where
        F: Fn(&ProbeContext) -> Result<T> + 'static,
    {
        Self {
            name,
            probe: Box::new(probe),
        }
    }
}

/// Environment handed to every strategy
#[derive(Debug, Clone)]
pub struct ProbeContext {
    /// Root of the sysfs tree, overridable for tests
    pub sysfs_root: PathBuf,
    /// Deadline for external utilities
    pub command_timeout: Duration,
    /// Installed memory, used by modelled estimates
    pub total_memory_bytes: u64,
    /// Memory in use, used by modelled estimates
    pub used_memory_bytes: u64,
    /// Watts drawn per 8 GB of RAM at full load
    pub ram_watts_per_8gb: f64,
    /// Mount point used for disk totals
    pub disk_path: PathBuf,
}

impl ProbeContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sysfs_root: PathBuf::from("/sys"),
            command_timeout: config.command_timeout(),
            total_memory_bytes: 0,
            used_memory_bytes: 0,
            ram_watts_per_8gb: config.ram_watts_per_8gb,
            disk_path: config.disk_path.clone(),
        }
    }

    pub fn with_memory(mut self, total_bytes: u64, used_bytes: u64) -> Self {
        self.total_memory_bytes = total_bytes;
        self.used_memory_bytes = used_bytes;
        self
    }
}

impl Default for ProbeContext {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A metric with an ordered fallback chain
pub struct SensorProvider<T> {
    metric: &'static str,
    strategies: Vec<Strategy<T>>,
}

impl<T> SensorProvider<T> {
    pub fn new(metric: &'static str, strategies: Vec<Strategy<T>>) -> Self {
        Self { metric, strategies }
    }

    pub fn metric(&self) -> &'static str {
        self.metric
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    /// Run the chain. Never fails: exhaustion yields `Unavailable`.
    pub fn read(&self, ctx: &ProbeContext) -> SensorReading<T> {
        for strategy in &self.strategies {
            match (strategy.probe)(ctx) {
                Ok(value) => {
                    debug!("{}: read via {}", self.metric, strategy.name);
                    return SensorReading::Value(value);
                }
                Err(e) => {
                    debug!("{}: {} failed: {}", self.metric, strategy.name, e);
                }
            }
        }
        debug!("{}: no strategy produced a value", self.metric);
        SensorReading::Unavailable
    }
}

/// The full set of providers used by a capture
pub struct SensorSuite {
    pub cpu_temperature: SensorProvider<f64>,
    pub ram_frequency: SensorProvider<f64>,
    pub ram_power: SensorProvider<f64>,
    pub battery: SensorProvider<BatteryStatus>,
    pub hardware_identity: SensorProvider<HardwareIdentity>,
}

impl SensorSuite {
    pub fn new() -> Self {
        Self {
            cpu_temperature: temperature::provider(),
            ram_frequency: ram::frequency_provider(),
            ram_power: ram::power_provider(),
            battery: battery::provider(),
            hardware_identity: identity::provider(),
        }
    }
}

impl Default for SensorSuite {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a numeric token, rejecting empty, non-numeric and non-finite input
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
