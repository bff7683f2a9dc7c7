// Core business logic module

pub mod action_log;
pub mod archive;
pub mod config;
pub mod processes;
pub mod sensors;
pub mod telemetry;

// Re-export commonly used items
pub use action_log::ActionLog;
pub use archive::{BackupRecord, SnapshotArchiver};
pub use config::Config;
pub use processes::{ProcessFilter, ProcessInfo, ProcessRegistry};
pub use telemetry::{TelemetryAggregator, TelemetrySnapshot};
