use gauge_core::Meter;

/// Render the live gauge: one bar per channel shown in the gauge, built
/// from the most recent sample, plus the activity LED.
///
/// Values are read through [`Meter::normalized_value`], so the display
/// range clamp applies here and not in the stored history.
pub fn render_gauge(meter: &Meter, width: usize) -> String {
    let mut out = String::new();

    for (i, channel) in meter.channels().iter().enumerate() {
        if !(channel.active && channel.show_in_gauge) {
            continue;
        }

        let value = meter.normalized_value(0, i);
        let filled = (value * width as f64).round() as usize;
        let filled = filled.min(width);

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!(
            "{:>6} ▕{}{}▏ {:>3.0}%",
            channel.name,
            "█".repeat(filled),
            "░".repeat(width - filled),
            value * 100.0,
        ));
    }

    if meter.led_active() {
        out.push_str(" ●");
    }

    out
}
