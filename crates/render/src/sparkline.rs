use gauge_core::Meter;

const RAMP: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the history graph: one sparkline row per channel shown in the
/// history, newest sample at the right edge.
///
/// Each column is resampled from the buffer window through
/// [`Meter::value_at`], which applies the channel's interpolation mode.
/// Returns an empty string when the history is hidden.
pub fn render_history(meter: &Meter, width: usize) -> String {
    if !meter.history_visible() || width == 0 {
        return String::new();
    }

    let last = (meter.history().n_samples() - 1) as f64;
    let mut out = String::new();

    for (i, channel) in meter.channels().iter().enumerate() {
        if !(channel.active && channel.show_in_history) {
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{:>6} ", channel.name));

        for column in 0..width {
            // rightmost column = slot 0 (now), leftmost = oldest slot
            let pos = if width == 1 {
                0.0
            } else {
                (width - 1 - column) as f64 / (width - 1) as f64 * last
            };
            let value = meter.value_at(pos, i).clamp(0.0, 1.0);
            let level = (value * (RAMP.len() - 1) as f64).round() as usize;
            out.push(RAMP[level.min(RAMP.len() - 1)]);
        }
    }

    out
}
