use taskmon::core::processes::{ProcessFilter, ProcessRegistry};
use taskmon::core::telemetry::SamplingWindow;
use taskmon::MonitorError;

fn registry() -> ProcessRegistry {
    ProcessRegistry::new(SamplingWindow::from_millis(0))
}

#[test]
fn test_by_cpu_is_bounded_and_descending() {
    let processes = registry().list(&ProcessFilter::ByCpu, Some(5));
    assert!(processes.len() <= 5);
    for pair in processes.windows(2) {
        assert!(pair[0].cpu_percent >= pair[1].cpu_percent);
    }
    for p in &processes {
        assert!(p.cpu_percent >= 0.0);
        assert!((0.0..=100.0).contains(&p.memory_percent));
    }
}

#[test]
fn test_by_pid_finds_own_process() {
    let own = std::process::id();
    let processes = registry().list(&ProcessFilter::ByPid(own.to_string()), None);
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0].pid, own);
}

#[test]
fn test_unparsable_pid_matches_nothing() {
    let processes = registry().list(&ProcessFilter::ByPid("12ab".to_string()), None);
    assert!(processes.is_empty());
}

#[test]
fn test_all_is_pid_ascending() {
    let processes = registry().list(&ProcessFilter::All, None);
    assert!(!processes.is_empty());
    for pair in processes.windows(2) {
        assert!(pair[0].pid < pair[1].pid);
    }
}

#[test]
fn test_terminate_nonexistent_pid_is_not_found() {
    let err = registry().terminate(i32::MAX as u32).unwrap_err();
    assert!(matches!(err, MonitorError::NotFound(_)), "got {:?}", err);
}

#[cfg(unix)]
#[test]
fn test_terminate_signals_child() {
    use std::os::unix::process::ExitStatusExt;
    use std::process::Command;

    let mut child = Command::new("sleep").arg("30").spawn().unwrap();
    let ack = registry().terminate(child.id()).unwrap();
    assert_eq!(ack.pid, child.id());

    let status = child.wait().unwrap();
    assert_eq!(status.signal(), Some(libc::SIGTERM));
}
