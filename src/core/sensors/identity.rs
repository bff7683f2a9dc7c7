//! Host hardware and OS identity.

use std::fs;
use std::path::Path;

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use super::{ProbeContext, SensorProvider, Strategy};
use crate::core::telemetry::disk;
use crate::core::telemetry::types::bytes_to_gb;
use crate::core::telemetry::HardwareIdentity;
use crate::error::{MonitorError, Result};

pub fn provider() -> SensorProvider<HardwareIdentity> {
    SensorProvider::new(
        "hardware_identity",
        vec![Strategy::new("sysinfo", from_sysinfo)],
    )
}

fn from_sysinfo(ctx: &ProbeContext) -> Result<HardwareIdentity> {
    let refresh = RefreshKind::nothing()
        .with_memory(MemoryRefreshKind::everything())
        .with_cpu(CpuRefreshKind::everything());
    let sys = System::new_with_specifics(refresh);

    let cpus = sys.cpus();
    if cpus.is_empty() {
        return Err(MonitorError::not_found("no CPUs reported"));
    }

    let brand = cpus[0].brand().trim().to_string();
    let processor = if brand.is_empty() {
        processor_from_cpuinfo(&ctx.sysfs_root).unwrap_or_else(|| cpus[0].vendor_id().to_string())
    } else {
        brand
    };

    Ok(HardwareIdentity {
        system: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
        version: System::long_os_version()
            .or_else(System::os_version)
            .unwrap_or_default(),
        architecture: System::cpu_arch(),
        processor,
        cpu_cores: System::physical_core_count(),
        cpu_threads: cpus.len(),
        memory_total_gb: bytes_to_gb(sys.total_memory()),
        disk_total_gb: disk::usage(&ctx.disk_path).total_gb,
    })
}

/// `/proc/cpuinfo` lives beside `/sys`; resolve it relative to the sysfs root
fn processor_from_cpuinfo(sysfs_root: &Path) -> Option<String> {
    let proc_root = sysfs_root.parent()?.join("proc").join("cpuinfo");
    let content = fs::read_to_string(proc_root).ok()?;
    parse_model_name(&content)
}

pub(crate) fn parse_model_name(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| {
            let key = key.trim();
            key == "model name" || key == "Model" || key == "Hardware"
        })
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}
