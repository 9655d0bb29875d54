use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::channel::{ChannelDescriptor, Interpolation};
use crate::color::Color;
use crate::error::{GaugeError, Result};
use crate::history::SampleHistory;

/// The meter shared between the sampler task and the render loop.
/// A single mutex guards all mutation and the render read.
pub type SharedMeter = Arc<Mutex<Meter>>;

/// A multi-channel telemetry meter: channel descriptors, display range,
/// LED state, and the sample-history window behind the readout.
///
/// All setters validate their input and reject invalid values with
/// [`GaugeError::InvalidConfiguration`], leaving the prior state untouched.
/// Changing the channel set or the history window reallocates the buffer
/// and clears all history.
#[derive(Debug)]
pub struct Meter {
    history: SampleHistory,
    channels: Vec<ChannelDescriptor>,
    range: (f64, f64),
    refresh_rate: f64,
    history_visible: bool,
    led_active: bool,
    led_color: Color,
    epoch: Instant,
}

impl Meter {
    pub const DEFAULT_REFRESH_RATE: f64 = 8.0;
    pub const DEFAULT_HISTORY_DURATION: f64 = 60.0;
    pub const DEFAULT_HISTORY_RESOLUTION: f64 = 1.0;

    /// Create a meter tracking the given channels, with a 60 s / 1 s
    /// history window and a `[0, 1]` display range.
    pub fn new(channels: Vec<ChannelDescriptor>) -> Self {
        let epoch = Instant::now();
        let history = SampleHistory::new(
            channels.len(),
            Self::DEFAULT_HISTORY_DURATION,
            Self::DEFAULT_HISTORY_RESOLUTION,
            0,
        )
        .expect("default window parameters are valid");

        Self {
            history,
            channels,
            range: (0.0, 1.0),
            refresh_rate: Self::DEFAULT_REFRESH_RATE,
            history_visible: true,
            led_active: false,
            led_color: Color::RED,
            epoch,
        }
    }

    /// Monotonic time since meter creation, in microseconds.
    #[inline]
    fn now(&self) -> i64 {
        self.epoch.elapsed().as_micros() as i64
    }

    // ── sampling path ────────────────────────────────────────────────────────

    /// Record a new observation: advance the window to now, then overwrite
    /// the most recent slot.
    pub fn add_sample(&mut self, sample: &[f64]) -> Result<()> {
        if sample.len() != self.channels.len() {
            return Err(GaugeError::InvalidConfiguration(format!(
                "sample has {} values, meter tracks {} channels",
                sample.len(),
                self.channels.len()
            )));
        }
        let now = self.now();
        self.history.advance(now);
        self.history.write_latest(sample)
    }

    /// One render-interval tick: advance the window so elapsed real time is
    /// represented even when no sample arrived, then decide whether the
    /// readout needs redrawing.
    pub fn tick(&mut self) -> bool {
        let now = self.now();
        self.history.advance(now);
        self.history.update_uniform(&self.channels, self.history_visible)
    }

    /// Zero the history window and reset its time marker.
    pub fn clear_history(&mut self) {
        let now = self.now();
        self.history.clear(now);
    }

    // ── configuration ────────────────────────────────────────────────────────

    /// Replace the channel set.  Reallocates the buffer and clears history.
    pub fn set_channels(&mut self, channels: Vec<ChannelDescriptor>) {
        let now = self.now();
        self.history.set_channel_count(channels.len(), now);
        self.channels = channels;
    }

    /// Reconfigure the history window.  Reallocates and clears on success;
    /// rejects non-positive resolution and negative duration.
    pub fn set_window(&mut self, duration: f64, resolution: f64) -> Result<()> {
        let now = self.now();
        self.history.set_window(duration, resolution, now)
    }

    /// Set the display range used when normalising values for rendering.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<()> {
        if !(min < max) {
            return Err(GaugeError::InvalidConfiguration(format!(
                "range min must be below max (got [{min}, {max}])"
            )));
        }
        self.range = (min, max);
        Ok(())
    }

    /// Set the sampling/render rate in Hz.
    pub fn set_refresh_rate(&mut self, hz: f64) -> Result<()> {
        if !(hz > 0.0) {
            return Err(GaugeError::InvalidConfiguration(format!(
                "refresh rate must be positive (got {hz})"
            )));
        }
        self.refresh_rate = hz;
        Ok(())
    }

    pub fn set_history_visible(&mut self, visible: bool) {
        self.history_visible = visible;
    }

    pub fn set_led_active(&mut self, active: bool) {
        self.led_active = active;
    }

    pub fn set_led_color(&mut self, color: Color) {
        self.led_color = color;
    }

    pub fn set_channel_active(&mut self, channel: usize, active: bool) -> Result<()> {
        self.channel_mut(channel)?.active = active;
        Ok(())
    }

    pub fn set_channel_color(&mut self, channel: usize, color: Color) -> Result<()> {
        self.channel_mut(channel)?.color = color;
        Ok(())
    }

    pub fn set_channel_interpolation(
        &mut self,
        channel: usize,
        interpolation: Interpolation,
    ) -> Result<()> {
        self.channel_mut(channel)?.interpolation = interpolation;
        Ok(())
    }

    pub fn set_channel_shown_in_gauge(&mut self, channel: usize, shown: bool) -> Result<()> {
        self.channel_mut(channel)?.show_in_gauge = shown;
        Ok(())
    }

    pub fn set_channel_shown_in_history(&mut self, channel: usize, shown: bool) -> Result<()> {
        self.channel_mut(channel)?.show_in_history = shown;
        Ok(())
    }

    fn channel_mut(&mut self, channel: usize) -> Result<&mut ChannelDescriptor> {
        let count = self.channels.len();
        self.channels.get_mut(channel).ok_or_else(|| {
            GaugeError::InvalidConfiguration(format!(
                "channel index {channel} out of range (meter tracks {count})"
            ))
        })
    }

    // ── read side ────────────────────────────────────────────────────────────

    /// The stored value at `slot` for `channel`, clamped to the display
    /// range and mapped to `[0, 1]`.  Non-finite stored values read as 0.
    pub fn normalized_value(&self, slot: usize, channel: usize) -> f64 {
        let raw = self.history.slot(slot)[channel];
        let (min, max) = self.range;
        let clamped = raw.clamp(min, max);
        if !clamped.is_finite() {
            return 0.0;
        }
        (clamped - min) / (max - min)
    }

    /// Normalised value at a fractional slot position, resampled with the
    /// channel's interpolation mode.  `pos` 0.0 is the most recent slot.
    pub fn value_at(&self, pos: f64, channel: usize) -> f64 {
        let last = (self.history.n_samples() - 1) as f64;
        let pos = pos.clamp(0.0, last);
        let base = pos.floor();
        let t = pos - base;
        let base = base as usize;

        let at = |i: i64| -> f64 {
            let i = i.clamp(0, last as i64) as usize;
            self.normalized_value(i, channel)
        };

        match self.channels[channel].interpolation {
            Interpolation::None => at(pos.round() as i64),
            Interpolation::Linear => {
                let a = at(base as i64);
                let b = at(base as i64 + 1);
                a + (b - a) * t
            }
            Interpolation::Cubic => {
                let p0 = at(base as i64 - 1);
                let p1 = at(base as i64);
                let p2 = at(base as i64 + 1);
                let p3 = at(base as i64 + 2);
                catmull_rom(p0, p1, p2, p3, t)
            }
        }
    }

    #[inline]
    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    #[inline]
    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    #[inline]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[inline]
    pub fn refresh_rate(&self) -> f64 {
        self.refresh_rate
    }

    /// Milliseconds between samples at the configured refresh rate.
    #[inline]
    pub fn sample_interval_ms(&self) -> u64 {
        ((1000.0 / self.refresh_rate).round() as u64).max(1)
    }

    #[inline]
    pub fn history_visible(&self) -> bool {
        self.history_visible
    }

    #[inline]
    pub fn led_active(&self) -> bool {
        self.led_active
    }

    #[inline]
    pub fn led_color(&self) -> Color {
        self.led_color
    }
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelDescriptor, ChannelKind};

    fn meter(n: usize) -> Meter {
        Meter::new(
            (0..n)
                .map(|i| ChannelDescriptor::new(format!("ch{i}"), ChannelKind::Cpu))
                .collect(),
        )
    }

    #[test]
    fn add_sample_rejects_wrong_width() {
        let mut m = meter(2);
        assert!(m.add_sample(&[1.0]).is_err());
        assert!(m.add_sample(&[0.1, 0.2]).is_ok());
        assert_eq!(m.history().latest(), &[0.1, 0.2]);
    }

    #[test]
    fn set_range_validation() {
        let mut m = meter(1);
        assert!(m.set_range(1.0, 0.0).is_err());
        assert!(m.set_range(0.5, 0.5).is_err());
        assert!(m.set_range(-10.0, 10.0).is_ok());
        assert_eq!(m.range(), (-10.0, 10.0));
    }

    #[test]
    fn set_refresh_rate_validation() {
        let mut m = meter(1);
        assert!(m.set_refresh_rate(0.0).is_err());
        assert!(m.set_refresh_rate(-4.0).is_err());
        assert!(m.set_refresh_rate(4.0).is_ok());
        assert_eq!(m.sample_interval_ms(), 250);
    }

    #[test]
    fn channel_setters_check_index() {
        let mut m = meter(1);
        assert!(m.set_channel_active(0, false).is_ok());
        assert!(m.set_channel_active(1, false).is_err());
        assert!(!m.channels()[0].active);
    }

    #[test]
    fn set_channels_clears_history() {
        let mut m = meter(1);
        m.add_sample(&[0.7]).unwrap();

        m.set_channels(vec![
            ChannelDescriptor::new("a", ChannelKind::Cpu),
            ChannelDescriptor::new("b", ChannelKind::Memory),
        ]);

        assert_eq!(m.history().n_values(), 2);
        assert_eq!(m.history().latest(), &[0.0, 0.0]);
    }

    #[test]
    fn normalized_value_clamps_to_range() {
        let mut m = meter(1);
        m.set_range(0.0, 10.0).unwrap();
        m.add_sample(&[25.0]).unwrap();
        assert_eq!(m.normalized_value(0, 0), 1.0);

        m.add_sample(&[-5.0]).unwrap();
        assert_eq!(m.normalized_value(0, 0), 0.0);

        m.add_sample(&[2.5]).unwrap();
        assert!((m.normalized_value(0, 0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn first_tick_draws_then_settles() {
        let mut m = meter(2);
        assert!(m.tick());
        assert!(!m.tick());
    }

    #[test]
    fn value_at_linear_midpoint() {
        let mut m = meter(1);
        m.add_sample(&[1.0]).unwrap();
        // slot 1 is still zero right after creation; halfway between the
        // 1.0 at slot 0 and the 0.0 at slot 1 reads 0.5
        let v = m.value_at(0.5, 0);
        assert!((v - 0.5).abs() < 0.05, "got {v}");
    }

    #[test]
    fn value_at_nearest_steps() {
        let mut m = meter(1);
        m.set_channel_interpolation(0, Interpolation::None).unwrap();
        m.add_sample(&[1.0]).unwrap();
        assert_eq!(m.value_at(0.4, 0), 1.0);
        assert_eq!(m.value_at(0.6, 0), 0.0);
    }

    #[test]
    fn value_at_cubic_hits_knots() {
        let mut m = meter(1);
        m.set_channel_interpolation(0, Interpolation::Cubic).unwrap();
        m.add_sample(&[1.0]).unwrap();
        assert!((m.value_at(0.0, 0) - 1.0).abs() < 1e-12);
        assert!(m.value_at(3.0, 0).abs() < 1e-12);
    }
}
