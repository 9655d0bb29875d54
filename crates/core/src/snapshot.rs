/// A point-in-time snapshot of system resource usage.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-core CPU usage (0.0 – 100.0).
    pub cpu_per_core: Vec<f32>,
    /// Average CPU usage across all cores.
    pub cpu_average: f32,
    /// RAM used in bytes.
    pub ram_used: u64,
    /// Total RAM in bytes.
    pub ram_total: u64,
    /// Root filesystem: used bytes.
    pub disk_used: u64,
    /// Root filesystem: total bytes.
    pub disk_total: u64,
    /// Network receive rate in bytes/second.
    pub net_rx: u64,
    /// Network transmit rate in bytes/second.
    pub net_tx: u64,
}

impl SystemSnapshot {
    /// RAM usage as a fraction in `[0, 1]`.
    #[must_use]
    pub fn ram_fraction(&self) -> f32 {
        if self.ram_total == 0 {
            return 0.0;
        }
        self.ram_used as f32 / self.ram_total as f32
    }

    /// Disk usage as a fraction in `[0, 1]`.
    #[must_use]
    pub fn disk_fraction(&self) -> f32 {
        if self.disk_total == 0 {
            return 0.0;
        }
        self.disk_used as f32 / self.disk_total as f32
    }
}
