use crate::snapshot::SystemSnapshot;

/// All messages (events) that can flow through the application event loop.
///
/// Sources:
/// - System monitor task  → `Snapshot`
/// - Render interval      → `Tick`
/// - Config watcher task  → `ConfigReloaded`
/// - Signal handler       → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    /// Fresh system resource snapshot from the background monitor task.
    Snapshot(SystemSnapshot),
    /// Render-interval tick — advances the history window and decides
    /// whether the readout needs to be redrawn.
    Tick,
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,
    /// Graceful shutdown requested.
    Shutdown,
}
