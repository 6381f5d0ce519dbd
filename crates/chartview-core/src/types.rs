// File: crates/chartview-core/src/types.rs
// Summary: Shared data types (item ids, host values, axis tuples, published axis data).

use serde::Serialize;

/// Opaque identifier of a host item. The pipeline never owns the item itself.
pub type ItemId = String;

/// A single value resolved from the host database for one item and one property.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    /// Composite value produced by a combined binding, e.g. `[3.0, 4.0, "label"]`.
    Record(Vec<Value>),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Record(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Record(_) => None,
        }
    }
}

/// Plottable value(s) of a tuple: one scalar, or one value per stack slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Scalar(f64),
    Stack(Vec<f64>),
}

impl XValue {
    /// Values in stack-slot order. A scalar is a single slot.
    pub fn as_slice(&self) -> &[f64] {
        match self {
            XValue::Scalar(v) => std::slice::from_ref(v),
            XValue::Stack(v) => v.as_slice(),
        }
    }

    pub fn num_stacks(&self) -> usize {
        self.as_slice().len()
    }

    /// First slot, used where only one value makes sense (pie slices).
    pub fn first(&self) -> Option<f64> {
        self.as_slice().first().copied()
    }
}

/// One `{x, y}` tuple produced by the XY accessor for an item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisTuple {
    pub x: XValue,
    pub y: String,
}

impl AxisTuple {
    pub fn scalar(x: f64, y: impl Into<String>) -> Self {
        Self { x: XValue::Scalar(x), y: y.into() }
    }

    pub fn stacked(x: Vec<f64>, y: impl Into<String>) -> Self {
        Self { x: XValue::Stack(x), y: y.into() }
    }
}

/// Per-item plot record published after a reconstruct pass.
///
/// The position of a datum in the published list is the join key used by the hit tester,
/// tick labels and popups.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisDatum {
    pub x: XValue,
    pub y: String,
    /// Rank coordinate on the category axis (base rank, before stack fan-out).
    pub z: f64,
    /// Scaled value per stack slot; `None` where the axis function rejected the value.
    pub scaled_x: Vec<Option<f64>>,
    pub color: String,
    /// Source items (the visited item, before proxy redirection).
    pub items: Vec<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_keys: Option<Vec<String>>,
}

/// A `[x, y]` coordinate pair in a series.
pub type SeriesPoint = [f64; 2];

/// Which of the two chart axes is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisId {
    X,
    Y,
}
