use gauge_core::SystemSnapshot;

/// One-line absolute-units footer for the readout: the gauge shows
/// normalised fractions, this shows the underlying quantities.
pub fn status_line(snapshot: &SystemSnapshot) -> String {
    format!(
        "RAM {}/{}  NET ↓{} ↑{}",
        format_bytes(snapshot.ram_used),
        format_bytes(snapshot.ram_total),
        format_rate(snapshot.net_rx),
        format_rate(snapshot.net_tx),
    )
}

/// Format a byte count as a human-readable string (e.g. `"7.3 GiB"`).
pub fn format_bytes(bytes: u64) -> String {
    const GIB: u64 = 1 << 30;
    const MIB: u64 = 1 << 20;
    const KIB: u64 = 1 << 10;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Format a bytes-per-second rate into a compact string.
pub fn format_rate(bps: u64) -> String {
    const MB: u64 = 1_000_000;
    const KB: u64 = 1_000;

    if bps >= MB {
        format!("{:.1}M", bps as f64 / MB as f64)
    } else if bps >= KB {
        format!("{:.0}K", bps as f64 / KB as f64)
    } else {
        format!("{bps}B")
    }
}
