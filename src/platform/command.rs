//! External utility invocation with a hard deadline.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{MonitorError, Result};

/// Upper bound for any probe command, whatever the configuration says
pub const MAX_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run `program` and return its stdout, killing it once `timeout` elapses.
///
/// A missing binary is `NotFound`, a non-zero exit is `Unknown`, and an
/// expired deadline is `Timeout`. Stderr is discarded.
pub fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let timeout = timeout.min(MAX_COMMAND_TIMEOUT);
    let path = which::which(program)
        .map_err(|_| MonitorError::not_found(format!("{} is not installed", program)))?;

    let mut child = Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| MonitorError::from_os(e, program))?;

    // Drained off-thread: a full pipe would block the child
    let reader = child.stdout.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut raw = Vec::new();
            let _ = pipe.read_to_end(&mut raw);
            raw
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(MonitorError::timeout(format!(
                    "{} did not finish within {:?}",
                    program, timeout
                )));
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let raw = reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    let stdout = String::from_utf8_lossy(&raw).into_owned();

    if !status.success() {
        return Err(MonitorError::unknown(format!(
            "{} exited with {}",
            program, status
        )));
    }

    Ok(stdout)
}
