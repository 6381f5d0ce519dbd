// File: crates/chartview-core/src/series.rs
// Summary: Bar/stacked-bar series builder: items -> ranked, scaled, color/stack keyed coordinates.
// Notes:
// - One `BarPass` holds all scratch state of a reconstruct (flags, range, series map);
//   it is created per build and consumed into `PreparedBars`.
// - Stacked mode sums raw values for the axis extent and bypasses the axis function, so a
//   logarithmic axis type has no effect on stacked charts.

use indexmap::IndexMap;
use serde::Serialize;

use crate::accessor::ItemAccessor;
use crate::axis::AxisRange;
use crate::color::{ColorClassifier, ColorCodingFlags};
use crate::config::BarChartSettings;
use crate::host::Database;
use crate::scale::AxisScaler;
use crate::types::{AxisDatum, AxisTuple, ItemId, SeriesPoint};

/// Series grouping key: bar color for single-value items, slot index for stacked values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SeriesKey {
    Color(String),
    Stack(usize),
}

/// Ordered map of series; keys keep first-insertion order, points keep visitation order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeriesMap {
    inner: IndexMap<SeriesKey, Vec<SeriesPoint>>,
}

impl SeriesMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: SeriesKey, point: SeriesPoint) {
        self.inner.entry(key).or_default().push(point);
    }

    pub fn get(&self, key: &SeriesKey) -> Option<&[SeriesPoint]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SeriesKey, &[SeriesPoint])> {
        self.inner.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn point_count(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }
}

/// Options of the bar pipeline derived from the view settings.
#[derive(Clone, Copy, Debug)]
pub struct BarBuildOptions {
    pub stacked: bool,
    pub vertical: bool,
    pub scaler: AxisScaler,
    /// Configured bounds; unset ends are the +/-inf sentinels.
    pub seed: AxisRange,
}

impl BarBuildOptions {
    pub fn from_settings(settings: &BarChartSettings) -> Self {
        Self {
            stacked: settings.stacked,
            vertical: settings.vertical_chart,
            scaler: AxisScaler::new(settings.axis_type),
            seed: AxisRange::seeded(settings.x_axis_min, settings.x_axis_max),
        }
    }
}

impl Default for BarBuildOptions {
    fn default() -> Self {
        Self::from_settings(&BarChartSettings::default())
    }
}

/// Output of one bar reconstruct pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PreparedBars {
    /// One datum per plottable item; index = join key for hits and labels.
    pub published: Vec<AxisDatum>,
    pub series: SeriesMap,
    pub unplottable: Vec<ItemId>,
    /// Finalized (snapped) value-axis range.
    pub range: AxisRange,
    pub flags: ColorCodingFlags,
}

impl PreparedBars {
    pub fn visited(&self) -> usize {
        self.published.len() + self.unplottable.len()
    }

    /// Published index for a rank coordinate. Fan-out offsets stay within half a
    /// rank of the base, so rounding maps them back to their item.
    pub fn index_for_rank(&self, rank: f64) -> Option<usize> {
        if !rank.is_finite() {
            return None;
        }
        let idx = rank.abs().round() as usize;
        (idx < self.published.len()).then_some(idx)
    }
}

/// Runs the bar pipeline over an item sequence.
pub struct SeriesBuilder<'a> {
    options: BarBuildOptions,
    accessor: &'a dyn ItemAccessor,
    database: &'a dyn Database,
    colors: &'a ColorClassifier,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(
        options: BarBuildOptions,
        accessor: &'a dyn ItemAccessor,
        database: &'a dyn Database,
        colors: &'a ColorClassifier,
    ) -> Self {
        Self { options, accessor, database, colors }
    }

    pub fn build<I>(&self, items: I) -> PreparedBars
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut pass = BarPass::new(self.options);
        for item in items {
            self.visit(&mut pass, item);
        }
        pass.finish()
    }

    fn visit(&self, pass: &mut BarPass, item: ItemId) {
        let keys = if self.colors.is_bound() {
            self.accessor.color_keys(self.database, &item)
        } else {
            None
        };
        let tuples = self.accessor.resolve_xy(self.database, &item);
        if tuples.len() > 1 {
            tracing::trace!(item = %item, tuples = tuples.len(), "plotting the last of several tuples");
        }
        // Every tuple widens the range; the last one is published.
        let mut last = None;
        for tuple in tuples {
            let scaled = pass.scale_slots(&item, tuple.x.as_slice());
            last = Some((tuple, scaled));
        }
        let Some((tuple, scaled)) = last else {
            pass.unplottable.push(item);
            return;
        };
        let color = self.colors.classify(keys.as_ref(), &mut pass.flags);
        let color_keys = keys.map(|k| k.into_iter().collect());
        pass.place(item, tuple, scaled, color, color_keys);
    }
}

struct BarPass {
    options: BarBuildOptions,
    rank: f64,
    range: AxisRange,
    flags: ColorCodingFlags,
    series: SeriesMap,
    published: Vec<AxisDatum>,
    unplottable: Vec<ItemId>,
}

impl BarPass {
    fn new(options: BarBuildOptions) -> Self {
        Self {
            options,
            rank: 0.0,
            range: options.seed,
            flags: ColorCodingFlags::default(),
            series: SeriesMap::new(),
            published: Vec::new(),
            unplottable: Vec::new(),
        }
    }

    fn scale_slots(&mut self, item: &str, values: &[f64]) -> Vec<Option<f64>> {
        if self.options.stacked {
            let sum: f64 = values.iter().sum();
            self.range.include(sum);
            return values.iter().map(|v| Some(*v)).collect();
        }
        values
            .iter()
            .map(|&v| match self.options.scaler.scale(v) {
                Ok(s) => {
                    self.range.include(s);
                    Some(s)
                }
                Err(err) => {
                    tracing::trace!(item = %item, %err, "value left out of axis range");
                    None
                }
            })
            .collect()
    }

    fn next_rank(&mut self) -> f64 {
        let z = self.rank;
        self.rank += if self.options.vertical { -1.0 } else { 1.0 };
        z
    }

    fn point(&self, rank: f64, value: f64) -> SeriesPoint {
        if self.options.vertical {
            [value, rank]
        } else {
            [rank, value]
        }
    }

    fn place(
        &mut self,
        item: ItemId,
        tuple: AxisTuple,
        scaled: Vec<Option<f64>>,
        color: String,
        color_keys: Option<Vec<String>>,
    ) {
        let z = self.next_rank();
        let num_stacks = scaled.len();

        if num_stacks == 1 {
            if let Some(v) = scaled[0].filter(|v| v.is_finite()) {
                let p = self.point(z, v);
                self.series.push(SeriesKey::Color(color.clone()), p);
            }
        } else {
            // Unstacked slots fan out symmetrically around the base rank.
            let step = 1.0 / (num_stacks as f64 + 1.0);
            let dir = if self.options.vertical { -1.0 } else { 1.0 };
            let centre = (num_stacks as f64 - 1.0) / 2.0;
            for (slot, value) in scaled.iter().enumerate() {
                let r = if self.options.stacked {
                    z
                } else {
                    z + dir * (slot as f64 - centre) * step
                };
                if let Some(v) = value.filter(|v| v.is_finite()) {
                    let p = self.point(r, v);
                    self.series.push(SeriesKey::Stack(slot), p);
                }
            }
        }

        self.published.push(AxisDatum {
            x: tuple.x,
            y: tuple.y,
            z,
            scaled_x: scaled,
            color,
            items: vec![item],
            color_keys,
        });
    }

    fn finish(self) -> PreparedBars {
        let range = self.range.finalized();
        tracing::debug!(
            published = self.published.len(),
            unplottable = self.unplottable.len(),
            series = self.series.len(),
            min = range.min,
            max = range.max,
            "bar series prepared"
        );
        PreparedBars {
            published: self.published,
            series: self.series,
            unplottable: self.unplottable,
            range,
            flags: self.flags,
        }
    }
}
