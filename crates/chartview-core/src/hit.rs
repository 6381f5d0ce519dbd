// File: crates/chartview-core/src/hit.rs
// Summary: Nearest-point hit testing over rendered series (bar and line/scatter metrics).
// Notes:
// - Points are scanned last-to-first inside each series so the last drawn bar wins ties.
// - The band/gate thresholds are fractions of the value-axis maximum, in data units.

use crate::types::SeriesPoint;

/// Fraction of the axis maximum the pointer may lie past a bar's end.
pub const BAR_BAND_FRACTION: f64 = 0.04;
/// Fraction of the axis maximum bounding the L1 distance for line/scatter hits.
pub const LINE_GATE_FRACTION: f64 = 0.01;

/// A candidate point with the distances measured to the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Closest {
    pub distance: f64,
    pub distance_x: f64,
    pub distance_y: f64,
    pub series_index: usize,
    pub data_index: usize,
    pub x: f64,
    pub y: f64,
}

/// Result of a successful hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Minimum under the chart-type metric.
    pub point: Closest,
    /// Minimum pure x distance (horizontal charts only).
    pub x: Option<Closest>,
    /// Minimum pure y distance (vertical charts only).
    pub y: Option<Closest>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTester {
    pub vertical: bool,
    pub line: bool,
    /// Finalized value-axis maximum.
    pub axis_max: f64,
}

impl HitTester {
    pub fn new(vertical: bool, line: bool, axis_max: f64) -> Self {
        Self { vertical, line, axis_max }
    }

    fn metric(&self, dx: f64, dy: f64) -> f64 {
        if self.line {
            dx * dx + dy * dy
        } else if self.vertical {
            dy
        } else {
            dx
        }
    }

    /// Closest point to `(mouse_x, mouse_y)`, or `None` when nothing was plotted or the
    /// pointer is outside every candidate's hit region.
    pub fn closest<'s, I>(&self, series: I, mouse_x: f64, mouse_y: f64) -> Option<Hit>
    where
        I: IntoIterator<Item = &'s [SeriesPoint]>,
    {
        let band = BAR_BAND_FRACTION * self.axis_max;
        let gate = LINE_GATE_FRACTION * self.axis_max;

        let mut compare = f64::MAX;
        let mut compare_x = f64::MAX;
        let mut compare_y = f64::MAX;
        let mut compare_xy = f64::MAX;
        let mut closest: Option<Closest> = None;
        let mut closest_x: Option<Closest> = None;
        let mut closest_y: Option<Closest> = None;
        let mut any_data = false;
        let mut within = false;

        for (i, data) in series.into_iter().enumerate() {
            if !data.is_empty() {
                any_data = true;
            }
            for j in (0..data.len()).rev() {
                let [x, y] = data[j];
                if (!self.vertical && !x.is_finite()) || (self.vertical && !y.is_finite()) {
                    continue;
                }
                let distance_x = (x - mouse_x).abs();
                let distance_y = (y - mouse_y).abs();
                let candidate = Closest {
                    distance: self.metric(distance_x, distance_y),
                    distance_x,
                    distance_y,
                    series_index: i,
                    data_index: j,
                    x,
                    y,
                };

                if candidate.distance < compare {
                    compare = candidate.distance;
                    closest = Some(candidate);
                }
                if !self.vertical && distance_x < compare_x {
                    compare_x = distance_x;
                    closest_x = Some(candidate);
                    if !self.line {
                        within = mouse_y >= 0.0 && mouse_y - y < band;
                    }
                }
                if self.vertical && distance_y < compare_y {
                    compare_y = distance_y;
                    closest_y = Some(candidate);
                    if !self.line {
                        within = mouse_x >= 0.0 && mouse_x - x < band;
                    }
                }
                if self.line {
                    let l1 = distance_x + distance_y;
                    if l1 < compare_xy {
                        if l1 < gate {
                            compare_xy = l1;
                            within = true;
                            closest = Some(candidate);
                        } else {
                            within = false;
                        }
                    }
                }
            }
        }

        if !(any_data && within) {
            return None;
        }
        closest.map(|point| Hit { point, x: closest_x, y: closest_y })
    }
}

impl Hit {
    /// Category-axis coordinate of the hit, used to find the published item.
    pub fn rank(&self, vertical: bool, line: bool) -> f64 {
        if line {
            return if vertical { self.point.y } else { self.point.x };
        }
        if vertical {
            self.y.map_or(self.point.y, |c| c.y)
        } else {
            self.x.map_or(self.point.x, |c| c.x)
        }
    }
}
