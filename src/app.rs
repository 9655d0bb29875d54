use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use gauge_config::{ConfigWatcher, GaugeConfig};
use gauge_core::{ChannelKind, Color, GaugeError, Message, Meter, SharedMeter, SystemSnapshot};
use gauge_render::{render_gauge, render_history};

const GAUGE_WIDTH: usize = 30;
const HISTORY_WIDTH: usize = 60;

/// Normalised level at which the warning LED lights up.
const LED_THRESHOLD: f64 = 0.9;

/// Main daemon loop: wires the sampler task, the render interval, and the
/// config watcher onto one shared meter.
pub async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(gauge_config::default_path);

    let config = gauge_config::load(&path)?;
    let meter: SharedMeter = Arc::new(Mutex::new(build_meter(&config)?));
    let mut kinds = channel_kinds(&config);
    let mut net_full_scale = config.meter.net_full_scale;

    let mut last_snapshot: Option<SystemSnapshot> = None;

    let mut interval_ms = meter.lock().unwrap().sample_interval_ms();
    let mut snapshots = gauge_system::spawn_monitor(interval_ms);
    let mut render_timer = tokio::time::interval(Duration::from_millis(interval_ms));
    let (_watcher, mut reload) = ConfigWatcher::spawn(&path);

    info!(
        "meter running: {} channels, {} ms interval",
        kinds.len(),
        interval_ms
    );

    loop {
        let message = tokio::select! {
            maybe = snapshots.recv() => match maybe {
                Some(snapshot) => Message::Snapshot(snapshot),
                None => Message::Shutdown,
            },
            _ = render_timer.tick() => Message::Tick,
            // a dead watcher only disables live reload, it is not fatal
            Some(()) = reload.recv() => Message::ConfigReloaded,
            _ = tokio::signal::ctrl_c() => Message::Shutdown,
        };

        match message {
            Message::Snapshot(snapshot) => {
                let values = gauge_system::sample_values(&kinds, &snapshot, net_full_scale);
                let mut m = meter.lock().unwrap();
                if let Err(e) = m.add_sample(&values) {
                    warn!("dropping sample: {e}");
                    continue;
                }
                let hot = m.channels().iter().enumerate().any(|(i, channel)| {
                    channel.visible() && m.normalized_value(0, i) >= LED_THRESHOLD
                });
                m.set_led_active(hot);
                drop(m);
                last_snapshot = Some(snapshot);
            }

            Message::Tick => {
                let mut m = meter.lock().unwrap();
                if m.tick() {
                    let gauge = render_gauge(&m, GAUGE_WIDTH);
                    let history = render_history(&m, HISTORY_WIDTH);
                    drop(m); // no I/O while holding the meter lock
                    let mut out = gauge;
                    if !history.is_empty() {
                        out.push('\n');
                        out.push_str(&history);
                    }
                    if let Some(snapshot) = &last_snapshot {
                        out.push('\n');
                        out.push_str(&gauge_system::status_line(snapshot));
                    }
                    println!("{out}\n");
                }
            }

            Message::ConfigReloaded => {
                let config = match gauge_config::load(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("config reload failed, keeping current settings: {e}");
                        continue;
                    }
                };

                {
                    let mut m = meter.lock().unwrap();
                    m.set_channels(config.channels.iter().map(|c| c.to_descriptor()).collect());
                    if let Err(e) = apply_settings(&mut m, &config) {
                        warn!("config partially applied: {e}");
                    }
                    interval_ms = m.sample_interval_ms();
                }
                kinds = channel_kinds(&config);
                net_full_scale = config.meter.net_full_scale;

                // restart the sampler and render interval at the new rate;
                // dropping the old receiver stops the old monitor task
                snapshots = gauge_system::spawn_monitor(interval_ms);
                render_timer = tokio::time::interval(Duration::from_millis(interval_ms));

                info!("config reloaded from {}", path.display());
            }

            Message::Shutdown => {
                info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn build_meter(config: &GaugeConfig) -> Result<Meter> {
    let mut meter = Meter::new(config.channels.iter().map(|c| c.to_descriptor()).collect());
    apply_settings(&mut meter, config)?;
    Ok(meter)
}

fn apply_settings(meter: &mut Meter, config: &GaugeConfig) -> Result<(), GaugeError> {
    meter.set_refresh_rate(config.meter.refresh_rate)?;
    meter.set_range(config.meter.range_min, config.meter.range_max)?;
    meter.set_history_visible(config.history.visible);
    if let Some(color) = Color::from_hex(&config.meter.led_color) {
        meter.set_led_color(color);
    }
    meter.set_window(config.history.duration, config.history.resolution)?;
    Ok(())
}

fn channel_kinds(config: &GaugeConfig) -> Vec<ChannelKind> {
    config.channels.iter().map(|c| c.kind).collect()
}
