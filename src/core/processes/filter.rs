//! Process list selection and ranking.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::ProcessInfo;
use crate::error::MonitorError;

/// Default number of entries for ranked views when the caller sets no limit
pub const DEFAULT_RANKED_LIMIT: usize = 10;

/// Which processes to return and in what order
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessFilter {
    /// Every process, pid ascending
    All,
    /// Highest CPU first
    ByCpu,
    /// Highest memory first
    ByMemory,
    /// Exact pid match. Stored as given so a non-numeric query matches nothing.
    ByPid(String),
    /// Case-insensitive substring of the process name
    ByName(String),
    /// Neither CPU nor memory in use, per [`ProcessInfo::idle`]
    Idle,
}

impl ProcessFilter {
    /// Build a filter from request parameters.
    ///
    /// `pid` takes precedence over `name`, which takes precedence over the
    /// named `filter` (`all`, `cpu`, `memory`, `idle`).
    pub fn from_query(
        filter: Option<&str>,
        pid: Option<&str>,
        name: Option<&str>,
    ) -> Result<Self, MonitorError> {
        if let Some(pid) = pid.filter(|p| !p.is_empty()) {
            return Ok(ProcessFilter::ByPid(pid.to_string()));
        }
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            return Ok(ProcessFilter::ByName(name.to_string()));
        }
        filter.map_or(Ok(ProcessFilter::All), |f| f.parse())
    }

    /// Limit applied when the caller passes none
    pub fn default_limit(&self) -> Option<usize> {
        match self {
            ProcessFilter::ByCpu | ProcessFilter::ByMemory => Some(DEFAULT_RANKED_LIMIT),
            _ => None,
        }
    }

    /// Select, order and truncate an enumeration.
    ///
    /// Sorting is stable, so processes with equal keys keep their
    /// enumeration order.
    pub fn apply(&self, mut processes: Vec<ProcessInfo>, limit: Option<usize>) -> Vec<ProcessInfo> {
        match self {
            ProcessFilter::All => processes.sort_by_key(|p| p.pid),
            ProcessFilter::ByCpu => {
                processes.sort_by(|a, b| descending(a.cpu_percent, b.cpu_percent))
            }
            ProcessFilter::ByMemory => {
                processes.sort_by(|a, b| descending(a.memory_percent, b.memory_percent))
            }
            ProcessFilter::ByPid(raw) => {
                let wanted = raw.trim().parse::<u32>().ok();
                processes.retain(|p| Some(p.pid) == wanted);
            }
            ProcessFilter::ByName(needle) => {
                let needle = needle.to_lowercase();
                processes.retain(|p| p.name.to_lowercase().contains(&needle));
            }
            ProcessFilter::Idle => processes.retain(|p| p.idle),
        }

        if let Some(limit) = limit.or_else(|| self.default_limit()) {
            processes.truncate(limit);
        }
        processes
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

impl FromStr for ProcessFilter {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(ProcessFilter::All),
            "cpu" => Ok(ProcessFilter::ByCpu),
            "memory" | "mem" => Ok(ProcessFilter::ByMemory),
            "idle" => Ok(ProcessFilter::Idle),
            other => Err(MonitorError::invalid_input(format!(
                "unknown process filter '{}' (expected all, cpu, memory or idle)",
                other
            ))),
        }
    }
}

impl fmt::Display for ProcessFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessFilter::All => write!(f, "all"),
            ProcessFilter::ByCpu => write!(f, "cpu"),
            ProcessFilter::ByMemory => write!(f, "memory"),
            ProcessFilter::ByPid(pid) => write!(f, "pid={}", pid),
            ProcessFilter::ByName(name) => write!(f, "name~{}", name),
            ProcessFilter::Idle => write!(f, "idle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(pid: u32, name: &str, cpu: f64, mem: f64) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: name.to_string(),
            cpu_percent: cpu,
            memory_percent: mem,
            idle: cpu == 0.0 && mem == 0.0,
        }
    }

    fn sample() -> Vec<ProcessInfo> {
        vec![
            proc(300, "firefox", 12.5, 8.2),
            proc(1, "systemd", 0.0, 0.1),
            proc(42, "kworker", 0.0, 0.0),
            proc(1234, "Firefox-Helper", 3.0, 2.0),
            proc(7, "kthreadd", 0.0, 0.0),
        ]
    }

    fn pids(list: &[ProcessInfo]) -> Vec<u32> {
        list.iter().map(|p| p.pid).collect()
    }

    #[test]
    fn test_all_sorted_by_pid() {
        let out = ProcessFilter::All.apply(sample(), None);
        assert_eq!(pids(&out), vec![1, 7, 42, 300, 1234]);
    }

    #[test]
    fn test_by_cpu_descending_with_stable_ties() {
        let out = ProcessFilter::ByCpu.apply(sample(), None);
        // zero-cpu entries keep enumeration order: 1, 42, 7
        assert_eq!(pids(&out), vec![300, 1234, 1, 42, 7]);
    }

    #[test]
    fn test_by_cpu_respects_limit() {
        let out = ProcessFilter::ByCpu.apply(sample(), Some(2));
        assert_eq!(pids(&out), vec![300, 1234]);
    }

    #[test]
    fn test_by_cpu_default_limit_is_ten() {
        let many: Vec<_> = (0..25).map(|i| proc(i, "p", i as f64, 0.0)).collect();
        let out = ProcessFilter::ByCpu.apply(many, None);
        assert_eq!(out.len(), DEFAULT_RANKED_LIMIT);
        assert_eq!(out[0].pid, 24);
    }

    #[test]
    fn test_zero_cpu_ties_below_limit_return_everything() {
        let list = vec![proc(10, "a", 0.0, 1.0), proc(5, "b", 0.0, 2.0)];
        let out = ProcessFilter::ByCpu.apply(list, Some(5));
        assert_eq!(pids(&out), vec![10, 5]);
    }

    #[test]
    fn test_by_memory_descending() {
        let out = ProcessFilter::ByMemory.apply(sample(), None);
        assert_eq!(&pids(&out)[..2], &[300, 1234]);
    }

    #[test]
    fn test_by_pid_exact_match() {
        let out = ProcessFilter::ByPid("1234".into()).apply(sample(), None);
        assert_eq!(pids(&out), vec![1234]);

        let none = ProcessFilter::ByPid("12".into()).apply(sample(), None);
        assert!(none.is_empty());

        let garbage = ProcessFilter::ByPid("abc".into()).apply(sample(), None);
        assert!(garbage.is_empty());
    }

    #[test]
    fn test_by_name_case_insensitive_substring() {
        let out = ProcessFilter::ByName("FIREFOX".into()).apply(sample(), None);
        assert_eq!(pids(&out), vec![300, 1234]);
    }

    #[test]
    fn test_idle_requires_zero_cpu_and_memory() {
        let out = ProcessFilter::Idle.apply(sample(), None);
        assert_eq!(pids(&out), vec![42, 7]);
    }

    #[test]
    fn test_idle_ignores_memory_rounded_to_zero() {
        let mut small = proc(55, "agent", 0.0, 0.0);
        small.idle = false;
        let list = vec![small, proc(7, "kthreadd", 0.0, 0.0)];

        let out = ProcessFilter::Idle.apply(list, None);
        assert_eq!(pids(&out), vec![7]);
    }

    #[test]
    fn test_from_query_precedence() {
        assert_eq!(
            ProcessFilter::from_query(Some("cpu"), Some("99"), Some("bash")).unwrap(),
            ProcessFilter::ByPid("99".into())
        );
        assert_eq!(
            ProcessFilter::from_query(Some("cpu"), None, Some("bash")).unwrap(),
            ProcessFilter::ByName("bash".into())
        );
        assert_eq!(
            ProcessFilter::from_query(Some("memory"), Some(""), None).unwrap(),
            ProcessFilter::ByMemory
        );
        assert_eq!(
            ProcessFilter::from_query(None, None, None).unwrap(),
            ProcessFilter::All
        );
        assert!(ProcessFilter::from_query(Some("hot"), None, None).is_err());
    }
}
