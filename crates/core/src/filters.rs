//! Smoothing helpers
//!
//! Small single-purpose filters used on noisy sensor values. Both are plain
//! value types with no allocation.

use crate::navigation::{wrap_180, wrap_360};

/// Number of samples the running average can hold.
pub const RA_MAX_SAMPLES: usize = 20;

/// Angle-aware exponential moving average for compass headings.
///
/// `alpha` is the smoothing constant in [0, 1]; smaller means more
/// smoothing. Interpolation follows the shortest arc, so a heading
/// crossing north blends through the 0/360 seam instead of sweeping
/// across the dial. The first sample passes through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct HeadingFilter {
    alpha: f32,
    last: Option<f32>,
}

impl HeadingFilter {
    /// Default smoothing rate used by the compass path.
    pub const DEFAULT_ALPHA: f32 = 0.20;

    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            last: None,
        }
    }

    /// Feed one heading in degrees, returning the filtered heading in
    /// [0, 360).
    pub fn apply(&mut self, heading_deg: f32) -> f32 {
        let out = match self.last {
            None => wrap_360(heading_deg),
            Some(last) => wrap_360(last + self.alpha * wrap_180(heading_deg - last)),
        };
        self.last = Some(out);
        out
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for HeadingFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALPHA)
    }
}

/// Windowed running average over up to [`RA_MAX_SAMPLES`] samples.
///
/// Until the window fills, the average is taken over the samples seen so
/// far; afterwards the oldest sample is replaced ring-buffer style.
#[derive(Debug, Clone)]
pub struct RunningAverage {
    samples: [f32; RA_MAX_SAMPLES],
    sum: f32,
    index: usize,
    count: usize,
    window: usize,
}

impl RunningAverage {
    /// Create an average over a window of `window` samples (clamped to
    /// 1..=[`RA_MAX_SAMPLES`]).
    pub fn new(window: usize) -> Self {
        Self {
            samples: [0.0; RA_MAX_SAMPLES],
            sum: 0.0,
            index: 0,
            count: 0,
            window: window.clamp(1, RA_MAX_SAMPLES),
        }
    }

    /// Feed one sample, returning the current average.
    pub fn apply(&mut self, sample: f32) -> f32 {
        if self.count < self.window {
            self.count += 1;
        } else {
            self.sum -= self.samples[self.index];
        }

        self.samples[self.index] = sample;
        self.sum += sample;

        self.index = (self.index + 1) % self.window;

        self.sum / self.count as f32
    }

    /// Current average without feeding a new sample; 0 before any sample.
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f32
        }
    }
}
