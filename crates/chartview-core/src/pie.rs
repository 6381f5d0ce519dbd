// File: crates/chartview-core/src/pie.rs
// Summary: Pie aggregation: one slice per item, optional grouping of small slices into "Others".

use serde::Serialize;

use crate::accessor::ItemAccessor;
use crate::config::PieChartSettings;
use crate::host::Database;
use crate::types::{AxisDatum, AxisTuple, ItemId};

pub const OTHERS_LABEL: &str = "Others";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieSlice {
    pub value: f64,
    pub label: String,
}

impl PieSlice {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self { value, label: label.into() }
    }

    /// `[[0, value]]`, the shape plotting backends expect for a slice.
    pub fn data(&self) -> [[f64; 2]; 1] {
        [[0.0, self.value]]
    }
}

/// Grouping rule: values below `cutoff * sum` go into one "Others" slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grouping {
    pub cutoff: f64,
}

impl Grouping {
    pub fn from_settings(settings: &PieChartSettings) -> Option<Self> {
        settings.group.then_some(Self { cutoff: settings.cutoff })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PieAggregate {
    pub slices: Vec<PieSlice>,
    pub published: Vec<AxisDatum>,
    pub unplottable: Vec<ItemId>,
    /// Sum of all values; only computed when grouping is enabled.
    pub sum: Option<f64>,
    /// Labels diverted into the "Others" slice, in visitation order.
    pub grouped_labels: Vec<String>,
}

impl PieAggregate {
    pub fn visited(&self) -> usize {
        self.published.len() + self.unplottable.len()
    }
}

/// Builds pie slices from `(value, label)` tuples.
pub struct PieAggregator<'a> {
    accessor: &'a dyn ItemAccessor,
    database: &'a dyn Database,
    grouping: Option<Grouping>,
}

impl<'a> PieAggregator<'a> {
    pub fn new(accessor: &'a dyn ItemAccessor, database: &'a dyn Database, grouping: Option<Grouping>) -> Self {
        Self { accessor, database, grouping }
    }

    fn first_tuple(&self, item: &str) -> Option<AxisTuple> {
        self.accessor.resolve_xy(self.database, item).into_iter().next()
    }

    pub fn aggregate(&self, items: &[ItemId]) -> PieAggregate {
        let mut out = PieAggregate::default();

        let threshold = self.grouping.map(|g| {
            let sum: f64 = items
                .iter()
                .filter_map(|item| self.first_tuple(item))
                .filter_map(|t| t.x.first())
                .sum();
            out.sum = Some(sum);
            g.cutoff * sum
        });

        let mut others = 0.0f64;
        for item in items {
            let Some(tuple) = self.first_tuple(item) else {
                out.unplottable.push(item.clone());
                continue;
            };
            let Some(value) = tuple.x.first() else {
                out.unplottable.push(item.clone());
                continue;
            };
            match threshold {
                Some(t) if value < t => {
                    others += value;
                    out.grouped_labels.push(tuple.y.clone());
                }
                _ => out.slices.push(PieSlice::new(value, tuple.y.clone())),
            }
            out.published.push(AxisDatum {
                z: out.published.len() as f64,
                scaled_x: vec![Some(value)],
                x: tuple.x,
                y: tuple.y,
                color: String::new(),
                items: vec![item.clone()],
                color_keys: None,
            });
        }

        if !out.grouped_labels.is_empty() {
            out.slices.push(PieSlice::new(others, OTHERS_LABEL));
        }
        tracing::debug!(
            slices = out.slices.len(),
            grouped = out.grouped_labels.len(),
            unplottable = out.unplottable.len(),
            "pie slices prepared"
        );
        out
    }
}
