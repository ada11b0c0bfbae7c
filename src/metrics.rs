use std::sync::{OnceLock, RwLock};

use sysinfo::{MemoryRefreshKind, RefreshKind, System};

/// Point-in-time process-visible memory, in megabytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySnapshot {
    pub used_mb: u64,
    pub avail_mb: u64,
}

static SYS: OnceLock<RwLock<System>> = OnceLock::new();

/// Refresh and read system memory. Cheap enough to call from progress
/// callbacks; the sysinfo handle is shared and only memory is refreshed.
pub fn memory_snapshot_mb() -> MemorySnapshot {
    let lock = SYS.get_or_init(|| {
        RwLock::new(System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        ))
    });
    let mut sys = match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    sys.refresh_memory();
    // sysinfo reports bytes as of v0.37
    let total_mb = sys.total_memory() / (1024 * 1024);
    let avail_mb = sys.available_memory() / (1024 * 1024);
    MemorySnapshot {
        used_mb: total_mb.saturating_sub(avail_mb),
        avail_mb,
    }
}
