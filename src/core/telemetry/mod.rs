//! Host telemetry capture.
//!
//! [`TelemetryAggregator::capture`] samples CPU, memory, disk, network, the
//! sensor suite and the process table into one immutable
//! [`TelemetrySnapshot`].

mod aggregator;
pub mod disk;
pub mod network;
mod reading;
pub mod sampler;
pub mod types;

pub use aggregator::{boot_time, uptime, TelemetryAggregator, TOP_PROCESS_COUNT};
pub use reading::SensorReading;
pub use sampler::SamplingWindow;
pub use types::{
    BatteryStatus, DiskUsage, HardwareIdentity, MemoryUsage, NetworkUsage, TelemetrySnapshot,
    TrafficSample, UptimeInfo,
};
