// File: crates/chartview-core/src/axis.rs
// Summary: Value-axis range model: configured seed, monotonic widening, tick-interval snapping.

use serde::Serialize;

/// Value-axis extent. `min = +inf` / `max = -inf` mean "unset".
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const fn unset() -> Self {
        Self { min: f64::INFINITY, max: f64::NEG_INFINITY }
    }

    /// Seed from optional configured bounds, using the sentinels where absent.
    pub fn seeded(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.unwrap_or(f64::INFINITY),
            max: max.unwrap_or(f64::NEG_INFINITY),
        }
    }

    /// Widen to include `v`. Non-finite values are ignored.
    #[inline]
    pub fn include(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_finite(&self) -> bool {
        self.span().is_finite()
    }

    /// Snap both ends outward to multiples of [`nice_interval`].
    /// Leaves the range untouched when no finite extent exists.
    pub fn finalize(&mut self) {
        let diff = self.span();
        if !diff.is_finite() {
            return;
        }
        let interval = nice_interval(diff);
        self.min = snap_floor(self.min, interval);
        self.max = snap_ceil(self.max, interval);
    }

    /// Returns a finalized copy.
    pub fn finalized(mut self) -> Self {
        self.finalize();
        self
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::unset()
    }
}

/// Power of ten `I` such that roughly twenty intervals cover `diff`.
/// Scales up while `I * 20 < diff`, down while `I > diff * 20`.
pub fn nice_interval(diff: f64) -> f64 {
    let mut interval = 1.0f64;
    if !diff.is_finite() || diff <= 0.0 {
        return interval;
    }
    if diff > 1.0 {
        while interval * 20.0 < diff {
            interval *= 10.0;
        }
    } else {
        while interval > diff * 20.0 {
            interval /= 10.0;
        }
    }
    interval
}

// Division by a power of ten that is below 1 accumulates error (0.3 / 0.1 = 2.9999999999999996);
// round quotients that are within a few ulps of an integer before flooring/ceiling.
const SNAP_EPS: f64 = 1e-9;

fn snap_floor(v: f64, interval: f64) -> f64 {
    let q = v / interval;
    let r = q.round();
    let q = if (q - r).abs() < SNAP_EPS { r } else { q.floor() };
    q * interval
}

fn snap_ceil(v: f64, interval: f64) -> f64 {
    let q = v / interval;
    let r = q.round();
    let q = if (q - r).abs() < SNAP_EPS { r } else { q.ceil() };
    q * interval
}
