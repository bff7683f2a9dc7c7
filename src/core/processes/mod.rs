//! OS process enumeration, ranking and termination.

mod filter;
mod registry;

pub use filter::{ProcessFilter, DEFAULT_RANKED_LIMIT};
pub use registry::{Ack, ProcessRegistry};

use serde::{Deserialize, Serialize};

use crate::core::telemetry::types::round1;

/// One row of the process table. Rebuilt on every enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    /// No CPU time and no resident memory, judged before rounding
    #[serde(skip)]
    pub idle: bool,
}

impl ProcessInfo {
    /// Normalize raw counters: percentages rounded to one decimal, `idle`
    /// taken from the unrounded values.
    pub fn from_raw(
        pid: u32,
        name: String,
        cpu_usage: f64,
        memory_bytes: u64,
        total_memory_bytes: u64,
    ) -> Self {
        let memory_percent = if total_memory_bytes > 0 {
            memory_bytes as f64 / total_memory_bytes as f64 * 100.0
        } else {
            0.0
        };
        Self {
            pid,
            name,
            cpu_percent: round1(cpu_usage.max(0.0)),
            memory_percent: round1(memory_percent.clamp(0.0, 100.0)),
            idle: cpu_usage <= 0.0 && memory_bytes == 0,
        }
    }
}
