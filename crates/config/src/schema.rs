use gauge_core::{ChannelDescriptor, ChannelKind, Color, Interpolation};
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `gauge.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Meter-wide settings (refresh rate, display range, LED).
    pub meter: MeterConfig,
    /// History window settings.
    pub history: HistoryConfig,
    /// Tracked channels, in gauge display order.
    pub channels: Vec<ChannelConfig>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            meter: MeterConfig::default(),
            history: HistoryConfig::default(),
            channels: vec![
                ChannelConfig::new(ChannelKind::Cpu),
                ChannelConfig::new(ChannelKind::Memory),
            ],
        }
    }
}

/// The `[meter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Samples (and render checks) per second.
    pub refresh_rate: f64,
    /// Lower bound of the display range.
    pub range_min: f64,
    /// Upper bound of the display range.
    pub range_max: f64,
    /// Activity LED color (hex, e.g. `"#f38ba8"`).
    pub led_color: String,
    /// Bytes/second at full deflection for throughput channels.
    pub net_full_scale: f64,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            refresh_rate: 8.0,
            range_min: 0.0,
            range_max: 1.0,
            led_color: "#f38ba8".to_string(),
            net_full_scale: 12_500_000.0, // 100 Mbit/s
        }
    }
}

/// The `[history]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether the history graph is rendered at all.
    pub visible: bool,
    /// Total retained time span in seconds.
    pub duration: f64,
    /// Seconds per history slot.
    pub resolution: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            visible: true,
            duration: 60.0,
            resolution: 1.0,
        }
    }
}

/// Config block for a single tracked channel (`[[channels]]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Which system signal to track.
    pub kind: ChannelKind,
    /// Optional display label override; defaults to the kind's label.
    #[serde(default)]
    pub name: Option<String>,
    /// Curve color (hex).
    #[serde(default = "default_channel_color")]
    pub color: String,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_true")]
    pub show_in_gauge: bool,
    #[serde(default = "default_true")]
    pub show_in_history: bool,
}

fn default_channel_color() -> String {
    "#cba6f7".to_string()
}

fn default_true() -> bool {
    true
}

impl ChannelConfig {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            name: None,
            color: default_channel_color(),
            interpolation: Interpolation::default(),
            active: true,
            show_in_gauge: true,
            show_in_history: true,
        }
    }

    /// Build the runtime descriptor.  Invalid color strings fall back to
    /// the default accent so loading never fails on a typo.
    pub fn to_descriptor(&self) -> ChannelDescriptor {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| self.kind.label().to_string());

        ChannelDescriptor {
            name,
            kind: self.kind,
            color: Color::from_hex(&self.color).unwrap_or(Color::PURPLE),
            interpolation: self.interpolation,
            active: self.active,
            show_in_gauge: self.show_in_gauge,
            show_in_history: self.show_in_history,
        }
    }
}
