use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::snapshot::SystemSnapshot;

/// How a channel's history curve is resampled between stored slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Nearest stored slot — step curve.
    None,
    #[default]
    Linear,
    /// Catmull-Rom through the four surrounding slots.
    Cubic,
}

/// Which system signal a channel tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelKind {
    Cpu,
    Memory,
    Disk,
    NetRx,
    NetTx,
}

impl ChannelKind {
    /// Default display label for the channel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Memory => "MEM",
            Self::Disk => "DISK",
            Self::NetRx => "NET↓",
            Self::NetTx => "NET↑",
        }
    }

    /// Extract this channel's scalar from a snapshot, normalised to `[0, 1]`.
    ///
    /// Throughput channels have no natural ceiling, so they are scaled
    /// against `net_full_scale` (bytes/second at full deflection).
    pub fn value_from(self, snapshot: &SystemSnapshot, net_full_scale: f64) -> f64 {
        match self {
            Self::Cpu => f64::from(snapshot.cpu_average) / 100.0,
            Self::Memory => f64::from(snapshot.ram_fraction()),
            Self::Disk => f64::from(snapshot.disk_fraction()),
            Self::NetRx => snapshot.net_rx as f64 / net_full_scale,
            Self::NetTx => snapshot.net_tx as f64 / net_full_scale,
        }
    }
}

/// Per-channel display and masking metadata.
///
/// `show_in_gauge` and `show_in_history` are independent: a channel can feed
/// the live gauge without appearing in the history graph and vice versa.
/// An inactive channel is masked out of both.
#[derive(Debug, Clone)]
pub struct ChannelDescriptor {
    pub name: String,
    pub kind: ChannelKind,
    pub color: Color,
    pub interpolation: Interpolation,
    pub active: bool,
    pub show_in_gauge: bool,
    pub show_in_history: bool,
}

impl ChannelDescriptor {
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            color: Color::PURPLE,
            interpolation: Interpolation::default(),
            active: true,
            show_in_gauge: true,
            show_in_history: true,
        }
    }

    /// Whether the channel contributes to the visible signal at all.
    #[inline]
    pub fn visible(&self) -> bool {
        self.active && (self.show_in_gauge || self.show_in_history)
    }
}
