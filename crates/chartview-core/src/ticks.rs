// File: crates/chartview-core/src/ticks.rs
// Summary: Tick counts and tick/track label formatting for bar charts.

use crate::types::{AxisDatum, AxisId};

/// Whether `axis` is the category (item) axis for the given orientation.
/// In a vertical chart items go down the y axis.
#[inline]
pub fn is_category_axis(vertical: bool, axis: AxisId) -> bool {
    match axis {
        AxisId::X => !vertical,
        AxisId::Y => vertical,
    }
}

/// Number of ticks requested for `axis`.
///
/// Category axis: one per item. Value axis: the configured count, else `min(5, items + 1)`.
pub fn tick_count(vertical: bool, axis: AxisId, current_size: usize, tick_num: Option<u32>) -> usize {
    if is_category_axis(vertical, axis) {
        return current_size;
    }
    match tick_num {
        Some(n) if n > 0 => n as usize,
        _ => (current_size + 1).min(5),
    }
}

/// Label lookup for ticks and mouse tracking, frozen at draw time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickFormatter {
    labels: Vec<String>,
    vertical: bool,
    /// Value ticks are exponents (`10^n`): log axis on an unstacked chart.
    exponent_ticks: bool,
}

impl TickFormatter {
    pub fn new(published: &[AxisDatum], vertical: bool, exponent_ticks: bool) -> Self {
        Self {
            labels: published.iter().map(|d| d.y.clone()).collect(),
            vertical,
            exponent_ticks,
        }
    }

    /// Label of the item at a category-axis position.
    pub fn category_label(&self, position: f64) -> Option<&str> {
        if !position.is_finite() {
            return None;
        }
        let idx = position.abs().round() as usize;
        let label = self.labels.get(idx).map(String::as_str);
        if label.is_none() {
            tracing::trace!(position, "tick outside published items");
        }
        label
    }

    pub fn format(&self, n: f64, axis: AxisId) -> String {
        if is_category_axis(self.vertical, axis) {
            return self.category_label(n).unwrap_or_default().to_string();
        }
        if self.exponent_ticks {
            format!("10^{n}")
        } else {
            format!("{n}")
        }
    }

    /// Mouse-track text `"<label>: <value>"` for a point under the cursor.
    pub fn track_label(&self, x: f64, y: f64) -> String {
        let (rank, value) = if self.vertical { (y, x) } else { (x, y) };
        let idx = rank.abs().round() as usize;
        let label = self.labels.get(idx).map(String::as_str).unwrap_or_default();
        format!("{label}: {value}")
    }
}
