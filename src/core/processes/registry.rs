use log::{debug, info};
use serde::Serialize;
use sysinfo::{ProcessStatus, System};

use super::{ProcessFilter, ProcessInfo};
use crate::core::telemetry::sampler::{sample_system, SamplingWindow};
use crate::error::{MonitorError, Result};

/// Confirmation that a termination signal was delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub pid: u32,
    pub signal: &'static str,
}

/// Enumerates and signals OS processes.
///
/// Holds no process state between calls; every `list` takes a fresh sample.
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    window: SamplingWindow,
}

impl ProcessRegistry {
    pub fn new(window: SamplingWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> SamplingWindow {
        self.window
    }

    /// Sample the process table over the registry's window and select from it.
    /// Blocks for the sampling window.
    pub fn list(&self, filter: &ProcessFilter, limit: Option<usize>) -> Vec<ProcessInfo> {
        let sys = sample_system(self.window);
        Self::list_from(&sys, filter, limit)
    }

    /// Select from an already-sampled system
    pub fn list_from(sys: &System, filter: &ProcessFilter, limit: Option<usize>) -> Vec<ProcessInfo> {
        filter.apply(Self::enumerate(sys), limit)
    }

    /// Normalize every process in `sys`, ordered by pid.
    ///
    /// Zombies and entries whose attributes could not be read are skipped.
    pub fn enumerate(sys: &System) -> Vec<ProcessInfo> {
        let total_memory = sys.total_memory();
        let mut processes: Vec<ProcessInfo> = sys
            .processes()
            .values()
            .filter_map(|proc| {
                let pid = proc.pid().as_u32();
                if proc.status() == ProcessStatus::Zombie {
                    debug!("skipping zombie process {}", pid);
                    return None;
                }
                let name = proc.name().to_string_lossy().to_string();
                let cpu = f64::from(proc.cpu_usage());
                if name.is_empty() || !cpu.is_finite() {
                    debug!("skipping unreadable process {}", pid);
                    return None;
                }
                Some(ProcessInfo::from_raw(pid, name, cpu, proc.memory(), total_memory))
            })
            .collect();

        processes.sort_by_key(|p| p.pid);
        processes
    }

    /// Ask `pid` to terminate. Returns once the signal is sent; does not wait
    /// for the process to exit.
    pub fn terminate(&self, pid: u32) -> Result<Ack> {
        send_terminate(pid)?;
        info!("sent termination request to pid {}", pid);
        Ok(Ack {
            pid,
            signal: TERMINATE_SIGNAL,
        })
    }
}

#[cfg(unix)]
const TERMINATE_SIGNAL: &str = "SIGTERM";

#[cfg(not(unix))]
const TERMINATE_SIGNAL: &str = "TerminateProcess";

#[cfg(unix)]
fn send_terminate(pid: u32) -> Result<()> {
    // pid 0 and negative pids address process groups, never a single process
    let raw = match libc::pid_t::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => return Err(MonitorError::not_found(format!("no process with pid {}", pid))),
    };

    // SAFETY: kill(2) has no memory-safety preconditions
    let rc = unsafe { libc::kill(raw, libc::SIGTERM) };
    if rc == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Err(MonitorError::not_found(format!(
            "no process with pid {}",
            pid
        ))),
        Some(libc::EPERM) => Err(MonitorError::permission_denied(format!(
            "not allowed to signal pid {}",
            pid
        ))),
        _ => Err(MonitorError::unknown(format!(
            "failed to signal pid {}: {}",
            pid, err
        ))),
    }
}

#[cfg(not(unix))]
fn send_terminate(pid: u32) -> Result<()> {
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate};

    let target = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[target]),
        true,
        ProcessRefreshKind::nothing(),
    );

    let process = sys
        .process(target)
        .ok_or_else(|| MonitorError::not_found(format!("no process with pid {}", pid)))?;

    if process.kill() {
        Ok(())
    } else {
        Err(MonitorError::unknown(format!(
            "the system refused to terminate pid {}",
            pid
        )))
    }
}
