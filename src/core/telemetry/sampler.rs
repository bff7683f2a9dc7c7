//! CPU rate sampling.
//!
//! CPU percentages are rates: sysinfo needs a baseline refresh, a pause, and a
//! second refresh before `cpu_usage()` means anything. The pause is passed in
//! explicitly so callers decide how long a capture blocks.

use std::thread;
use std::time::Duration;

use sysinfo::{
    CpuRefreshKind, MemoryRefreshKind, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System,
};

/// Length of the blocking measurement window between two counter reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingWindow(Duration);

impl SamplingWindow {
    pub const DEFAULT_MS: u64 = 1000;

    /// Windows shorter than sysinfo's minimum refresh interval are widened to it
    pub fn new(duration: Duration) -> Self {
        Self(duration.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL))
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }
}

impl Default for SamplingWindow {
    fn default() -> Self {
        Self::from_millis(Self::DEFAULT_MS)
    }
}

fn process_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing().with_cpu().with_memory()
}

/// Take two refreshes of CPU and process counters separated by `window`.
///
/// The returned `System` holds global and per-process CPU rates for that
/// window plus current memory counters. Blocks for the window's duration.
pub fn sample_system(window: SamplingWindow) -> System {
    let refresh = RefreshKind::nothing()
        .with_cpu(CpuRefreshKind::everything())
        .with_memory(MemoryRefreshKind::everything())
        .with_processes(process_refresh_kind());
    let mut sys = System::new_with_specifics(refresh);

    thread::sleep(window.duration());

    sys.refresh_cpu_all();
    sys.refresh_memory();
    sys.refresh_processes_specifics(ProcessesToUpdate::All, true, process_refresh_kind());
    sys
}
