use std::path::Path;

use sysinfo::{Disk, Disks};

use super::types::{bytes_to_gb, percent_of, DiskUsage};

/// The disk whose mount point is the longest prefix of `path`
pub fn mount_for<'a>(disks: &'a Disks, path: &Path) -> Option<&'a Disk> {
    disks
        .iter()
        .filter(|d| path.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())
}

/// Capacity of the filesystem holding `path`; zeroes when it cannot be found
pub fn usage(path: &Path) -> DiskUsage {
    let disks = Disks::new_with_refreshed_list();
    match mount_for(&disks, path) {
        Some(disk) => {
            let total = disk.total_space();
            let free = disk.available_space();
            let used = total.saturating_sub(free);
            DiskUsage {
                total_gb: bytes_to_gb(total),
                used_gb: bytes_to_gb(used),
                free_gb: bytes_to_gb(free),
                percent: percent_of(used, total),
            }
        }
        None => {
            log::warn!("no mounted filesystem holds {}", path.display());
            DiskUsage::default()
        }
    }
}
