use crate::channel::ChannelDescriptor;
use crate::error::{GaugeError, Result};

/// Microseconds per second — the unit of the monotonic timestamps passed to
/// [`SampleHistory::advance`] and friends.
pub const TIME_UNIT: i64 = 1_000_000;

/// Extra slots kept beyond the configured window so cubic resampling has
/// lookahead/lookbehind neighbours at both edges.
const PADDING_SLOTS: usize = 4;

/// Fixed-capacity, time-ordered window of the most recent multi-channel
/// samples.
///
/// Storage is a single flat slot-major buffer: slot `i` occupies
/// `samples[i * n_values .. (i + 1) * n_values]`, slot 0 being the most
/// recent and slot `n_samples - 1` the oldest.  Advancing the window shifts
/// slots towards the tail and zero-fills the slots newly exposed at the
/// head, so gaps in real time show up as explicit zero samples rather than
/// being compressed away.
///
/// Values are stored raw; clamping to the display range happens at lookup
/// time in the owning meter.
#[derive(Debug)]
pub struct SampleHistory {
    samples: Vec<f64>,
    n_samples: usize,
    n_values: usize,
    duration: f64,
    resolution: f64,
    /// Microseconds per slot: `round(resolution * TIME_UNIT)`, at least 1.
    sample_duration: i64,
    /// Time of the most recent slot, in `sample_duration` units.
    last_sample_time: i64,
    /// Masked copy of slot 0 from the last uniformity check, kept only
    /// while the whole window was uniform.  Lets a tick skip the redraw
    /// when nothing visible has changed.
    uniform_sample: Option<Vec<f64>>,
}

impl SampleHistory {
    /// Create a history window holding `n_values` values per slot.
    ///
    /// `now` is the current monotonic time in microseconds; it seeds the
    /// time marker so the first `advance` measures elapsed time correctly.
    pub fn new(n_values: usize, duration: f64, resolution: f64, now: i64) -> Result<Self> {
        if resolution <= 0.0 {
            return Err(GaugeError::InvalidConfiguration(format!(
                "history resolution must be positive (got {resolution})"
            )));
        }
        if duration < 0.0 {
            return Err(GaugeError::InvalidConfiguration(format!(
                "history duration must be non-negative (got {duration})"
            )));
        }

        let n_samples = slot_count(duration, resolution);
        let sample_duration = slot_duration(resolution);

        let mut history = Self {
            samples: vec![0.0; n_samples * n_values],
            n_samples,
            n_values,
            duration,
            resolution,
            sample_duration,
            last_sample_time: 0,
            uniform_sample: None,
        };
        history.clear(now);
        Ok(history)
    }

    /// Reallocate for `n` values per slot, clearing all history.
    pub fn set_channel_count(&mut self, n: usize, now: i64) {
        self.n_values = n;
        self.samples = vec![0.0; self.n_samples * n];
        self.clear(now);
    }

    /// Recompute the window geometry for a new duration/resolution pair,
    /// reallocating and clearing all history.
    ///
    /// Rejects non-positive resolution and negative duration, leaving the
    /// prior window untouched.
    pub fn set_window(&mut self, duration: f64, resolution: f64, now: i64) -> Result<()> {
        if resolution <= 0.0 {
            return Err(GaugeError::InvalidConfiguration(format!(
                "history resolution must be positive (got {resolution})"
            )));
        }
        if duration < 0.0 {
            return Err(GaugeError::InvalidConfiguration(format!(
                "history duration must be non-negative (got {duration})"
            )));
        }

        self.duration = duration;
        self.resolution = resolution;
        self.n_samples = slot_count(duration, resolution);
        self.sample_duration = slot_duration(resolution);
        self.samples = vec![0.0; self.n_samples * self.n_values];
        self.clear(now);
        Ok(())
    }

    /// Zero every slot, reset the time marker to `now`, and drop the
    /// uniform-sample cache.
    pub fn clear(&mut self, now: i64) {
        self.samples.fill(0.0);
        self.last_sample_time = now / self.sample_duration;
        self.uniform_sample = None;
    }

    /// Advance the window to `now`, shifting stored slots towards the tail
    /// and zero-filling the newly exposed leading slots.
    ///
    /// The number of elapsed slots is clamped to `[0, n_samples - 1]`: a
    /// stalled caller wipes at most the whole window, and a backwards clock
    /// reading never shifts and never rewinds the time marker.
    pub fn advance(&mut self, now: i64) {
        let time = now / self.sample_duration;
        let elapsed = (time - self.last_sample_time).clamp(0, self.n_samples as i64 - 1) as usize;

        if elapsed > 0 {
            let nv = self.n_values;
            let keep = (self.n_samples - elapsed) * nv;
            self.samples.copy_within(..keep, elapsed * nv);
            self.samples[..elapsed * nv].fill(0.0);
        }

        self.last_sample_time = self.last_sample_time.max(time);
    }

    /// Overwrite slot 0 with `sample`.  Does not shift; call [`advance`]
    /// first if a new time slot is needed.
    ///
    /// [`advance`]: SampleHistory::advance
    pub fn write_latest(&mut self, sample: &[f64]) -> Result<()> {
        if sample.len() != self.n_values {
            return Err(GaugeError::InvalidConfiguration(format!(
                "sample has {} values, history expects {}",
                sample.len(),
                self.n_values
            )));
        }
        self.samples[..self.n_values].copy_from_slice(sample);
        Ok(())
    }

    /// Borrow slot `i` (0 = most recent).  Panics if `i >= n_samples`.
    #[inline]
    pub fn slot(&self, i: usize) -> &[f64] {
        &self.samples[i * self.n_values..(i + 1) * self.n_values]
    }

    /// The most recent slot.
    #[inline]
    pub fn latest(&self) -> &[f64] {
        self.slot(0)
    }

    /// Copy `sample` into `out`, zeroing every value whose channel is
    /// inactive or hidden from both the gauge and the history graph.
    pub fn mask_sample_into(sample: &[f64], channels: &[ChannelDescriptor], out: &mut [f64]) {
        out.fill(0.0);
        for ((out, &value), channel) in out.iter_mut().zip(sample).zip(channels) {
            if channel.visible() {
                *out = value;
            }
        }
    }

    /// Allocating convenience wrapper around [`mask_sample_into`].
    ///
    /// [`mask_sample_into`]: SampleHistory::mask_sample_into
    pub fn mask_sample(sample: &[f64], channels: &[ChannelDescriptor]) -> Vec<f64> {
        let mut out = vec![0.0; sample.len()];
        Self::mask_sample_into(sample, channels, &mut out);
        out
    }

    /// Whether every slot in the window is bitwise-identical to slot 0
    /// after masking — i.e. the visible signal is static.
    pub fn is_uniform_window(&self, channels: &[ChannelDescriptor]) -> bool {
        let mut masked0 = vec![0.0; self.n_values];
        Self::mask_sample_into(self.slot(0), channels, &mut masked0);

        let mut masked = vec![0.0; self.n_values];
        for i in 1..self.n_samples {
            Self::mask_sample_into(self.slot(i), channels, &mut masked);
            if !bits_equal(&masked0, &masked) {
                return false;
            }
        }
        true
    }

    /// Run the redraw-suppression check for one tick, maintaining the
    /// uniform-sample cache.  Returns `true` when the readout needs to be
    /// redrawn.
    ///
    /// When `history_visible` is false only slot 0 matters, so the window
    /// counts as uniform without scanning.
    pub fn update_uniform(&mut self, channels: &[ChannelDescriptor], history_visible: bool) -> bool {
        let mut masked0 = vec![0.0; self.n_values];
        Self::mask_sample_into(self.slot(0), channels, &mut masked0);

        let uniform = if history_visible {
            let mut masked = vec![0.0; self.n_values];
            (1..self.n_samples).all(|i| {
                Self::mask_sample_into(self.slot(i), channels, &mut masked);
                bits_equal(&masked0, &masked)
            })
        } else {
            true
        };

        let mut redraw = true;
        if uniform {
            if let Some(previous) = &self.uniform_sample {
                redraw = !bits_equal(&masked0, previous);
            }
            self.uniform_sample = Some(masked0);
        } else {
            self.uniform_sample = None;
        }
        redraw
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    pub fn n_values(&self) -> usize {
        self.n_values
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Microseconds covered by one slot.
    #[inline]
    pub fn sample_duration(&self) -> i64 {
        self.sample_duration
    }

    /// Time of the most recent slot, in `sample_duration` units.
    #[inline]
    pub fn last_sample_time(&self) -> i64 {
        self.last_sample_time
    }
}

fn slot_count(duration: f64, resolution: f64) -> usize {
    (duration / resolution).ceil() as usize + PADDING_SLOTS
}

fn slot_duration(resolution: f64) -> i64 {
    ((resolution * TIME_UNIT as f64).round() as i64).max(1)
}

/// Bitwise sample equality, matching the stored representation exactly
/// (distinguishes 0.0 from -0.0, treats identical NaNs as equal).
fn bits_equal(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.to_bits() == y.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelDescriptor, ChannelKind};

    fn channels(n: usize) -> Vec<ChannelDescriptor> {
        (0..n)
            .map(|i| ChannelDescriptor::new(format!("ch{i}"), ChannelKind::Cpu))
            .collect()
    }

    #[test]
    fn capacity_formula() {
        for (duration, resolution, expected) in [
            (60.0, 1.0, 64),
            (4.0, 1.0, 8),
            (10.0, 3.0, 8), // ceil(10/3) = 4
            (0.0, 1.0, 4),
            (0.5, 1.0, 5),
        ] {
            let h = SampleHistory::new(1, duration, resolution, 0).unwrap();
            assert_eq!(h.n_samples(), expected, "duration={duration} resolution={resolution}");
            assert!(h.n_samples() >= 4);
        }
    }

    #[test]
    fn rejects_invalid_window() {
        assert!(SampleHistory::new(1, 10.0, -1.0, 0).is_err());
        assert!(SampleHistory::new(1, 10.0, 0.0, 0).is_err());
        assert!(SampleHistory::new(1, -1.0, 1.0, 0).is_err());
    }

    #[test]
    fn set_window_rejection_keeps_prior_state() {
        let mut h = SampleHistory::new(2, 4.0, 1.0, 0).unwrap();
        h.write_latest(&[1.0, 2.0]).unwrap();

        assert!(h.set_window(10.0, -1.0, 0).is_err());

        assert_eq!(h.n_samples(), 8);
        assert_eq!(h.latest(), &[1.0, 2.0]);
        assert_eq!(h.resolution(), 1.0);
    }

    #[test]
    fn set_channel_count_zeroes_and_resizes() {
        let mut h = SampleHistory::new(2, 4.0, 1.0, 0).unwrap();
        h.write_latest(&[1.0, 2.0]).unwrap();

        h.set_channel_count(3, 0);

        assert_eq!(h.n_values(), 3);
        for i in 0..h.n_samples() {
            assert_eq!(h.slot(i), &[0.0, 0.0, 0.0]);
        }

        // new width flows through advance and write_latest
        h.advance(2 * TIME_UNIT);
        h.write_latest(&[0.5, 0.6, 0.7]).unwrap();
        assert_eq!(h.latest(), &[0.5, 0.6, 0.7]);
    }

    #[test]
    fn write_latest_round_trip() {
        let mut h = SampleHistory::new(3, 4.0, 1.0, 0).unwrap();
        h.write_latest(&[0.25, -1.5, 7.0]).unwrap();
        assert_eq!(h.slot(0), &[0.25, -1.5, 7.0]);
        // raw storage, no clamping
        assert_eq!(h.slot(0)[2], 7.0);
    }

    #[test]
    fn write_latest_rejects_wrong_width() {
        let mut h = SampleHistory::new(2, 4.0, 1.0, 0).unwrap();
        assert!(h.write_latest(&[1.0]).is_err());
        assert!(h.write_latest(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn shift_moves_samples_towards_tail() {
        let mut h = SampleHistory::new(1, 4.0, 1.0, 0).unwrap();
        h.write_latest(&[1.0]).unwrap();
        h.advance(TIME_UNIT);
        h.write_latest(&[2.0]).unwrap();
        h.advance(3 * TIME_UNIT);

        // [0, 0, 2, 1, 0, 0, 0, 0]
        assert_eq!(h.slot(0), &[0.0]);
        assert_eq!(h.slot(1), &[0.0]);
        assert_eq!(h.slot(2), &[2.0]);
        assert_eq!(h.slot(3), &[1.0]);
        for i in 4..h.n_samples() {
            assert_eq!(h.slot(i), &[0.0]);
        }
    }

    #[test]
    fn shift_drops_samples_off_the_tail() {
        let mut h = SampleHistory::new(1, 0.0, 1.0, 0).unwrap(); // 4 slots
        for step in 1..=4 {
            h.advance(step * TIME_UNIT);
            h.write_latest(&[step as f64]).unwrap();
        }
        // [4, 3, 2, 1]
        h.advance(6 * TIME_UNIT);
        // [0, 0, 4, 3] — 1 and 2 fell off
        assert_eq!(h.slot(0), &[0.0]);
        assert_eq!(h.slot(1), &[0.0]);
        assert_eq!(h.slot(2), &[4.0]);
        assert_eq!(h.slot(3), &[3.0]);
    }

    #[test]
    fn advance_is_idempotent_for_equal_now() {
        let mut h = SampleHistory::new(1, 4.0, 1.0, 0).unwrap();
        h.write_latest(&[1.0]).unwrap();
        h.advance(2 * TIME_UNIT);
        let snapshot: Vec<f64> = (0..h.n_samples()).flat_map(|i| h.slot(i).to_vec()).collect();
        let marker = h.last_sample_time();

        h.advance(2 * TIME_UNIT);

        let again: Vec<f64> = (0..h.n_samples()).flat_map(|i| h.slot(i).to_vec()).collect();
        assert_eq!(snapshot, again);
        assert_eq!(marker, h.last_sample_time());
    }

    #[test]
    fn elapsed_clamps_to_window_size() {
        let mut h = SampleHistory::new(1, 4.0, 1.0, 0).unwrap();
        h.write_latest(&[9.0]).unwrap();

        // a week of wall-clock stall wipes the window but must not overflow
        h.advance(7 * 24 * 3600 * TIME_UNIT);

        for i in 0..h.n_samples() {
            assert_eq!(h.slot(i), &[0.0]);
        }
    }

    #[test]
    fn backwards_clock_never_shifts_or_rewinds() {
        let mut h = SampleHistory::new(1, 4.0, 1.0, 0).unwrap();
        h.advance(5 * TIME_UNIT);
        h.write_latest(&[3.0]).unwrap();
        let marker = h.last_sample_time();

        h.advance(2 * TIME_UNIT);

        assert_eq!(h.latest(), &[3.0]);
        assert_eq!(h.last_sample_time(), marker);
    }

    #[test]
    fn two_channel_scenario() {
        // duration 4, resolution 1 => 8 slots
        let mut h = SampleHistory::new(2, 4.0, 1.0, 0).unwrap();
        assert_eq!(h.n_samples(), 8);

        h.write_latest(&[1.0, 0.0]).unwrap();
        h.advance(TIME_UNIT);
        h.write_latest(&[2.0, 0.0]).unwrap();

        assert_eq!(h.slot(0), &[2.0, 0.0]);
        assert_eq!(h.slot(1), &[1.0, 0.0]);
        for i in 2..8 {
            assert_eq!(h.slot(i), &[0.0, 0.0]);
        }
    }

    #[test]
    fn fresh_window_is_uniform_for_any_descriptors() {
        let h = SampleHistory::new(2, 4.0, 1.0, 0).unwrap();
        let mut chs = channels(2);
        assert!(h.is_uniform_window(&chs));

        chs[0].active = false;
        chs[1].show_in_gauge = false;
        assert!(h.is_uniform_window(&chs));
    }

    #[test]
    fn masking_hides_invisible_channels() {
        let mut chs = channels(3);
        chs[0].active = false;
        chs[2].show_in_gauge = false;
        chs[2].show_in_history = false;

        let masked = SampleHistory::mask_sample(&[1.0, 2.0, 3.0], &chs);
        assert_eq!(masked, vec![0.0, 2.0, 0.0]);
    }

    #[test]
    fn uniformity_ignores_masked_channels() {
        let mut h = SampleHistory::new(2, 4.0, 1.0, 0).unwrap();
        h.write_latest(&[0.0, 5.0]).unwrap();

        let mut chs = channels(2);
        assert!(!h.is_uniform_window(&chs));

        // hiding the noisy channel makes the window uniform again
        chs[1].active = false;
        assert!(h.is_uniform_window(&chs));
    }

    #[test]
    fn update_uniform_suppresses_redundant_redraws() {
        let mut h = SampleHistory::new(1, 4.0, 1.0, 0).unwrap();
        let chs = channels(1);

        // first tick always draws: no cached uniform sample yet
        assert!(h.update_uniform(&chs, true));
        // nothing changed since
        assert!(!h.update_uniform(&chs, true));

        // a new value in slot 0 breaks uniformity => redraw
        h.write_latest(&[1.0]).unwrap();
        assert!(h.update_uniform(&chs, true));

        // once the value has flooded the whole window it is uniform again,
        // but differs from the cached all-zero sample => one more redraw
        for step in 1..=(h.n_samples() as i64) {
            h.advance(step * TIME_UNIT);
            h.write_latest(&[1.0]).unwrap();
        }
        assert!(h.update_uniform(&chs, true));
        assert!(!h.update_uniform(&chs, true));
    }

    #[test]
    fn clear_resets_contents_and_cache() {
        let mut h = SampleHistory::new(1, 4.0, 1.0, 0).unwrap();
        h.write_latest(&[1.0]).unwrap();
        assert!(h.update_uniform(&channels(1), true));

        h.clear(10 * TIME_UNIT);

        assert_eq!(h.latest(), &[0.0]);
        assert_eq!(h.last_sample_time(), 10);
        // cache dropped: next uniform tick draws once
        assert!(h.update_uniform(&channels(1), true));
    }
}
