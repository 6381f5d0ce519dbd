// File: crates/chartview-core/src/render.rs
// Summary: Draw requests handed to the plotting backend (bar/line and pie), built from prepared data.

use serde::Serialize;

use crate::config::{BarChartSettings, PieChartSettings};
use crate::pie::{PieAggregate, PieSlice};
use crate::series::{PreparedBars, SeriesKey};
use crate::ticks::{tick_count, TickFormatter};
use crate::types::{AxisId, SeriesPoint};

pub const DEFAULT_BAR_WIDTH: f64 = 0.8;
pub const LEGEND_BACKGROUND: &str = "#D2E8FF";
pub const GRID_COLOR: &str = "#000000";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataSeries {
    pub data: Vec<SeriesPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AsRef<[SeriesPoint]> for DataSeries {
    fn as_ref(&self) -> &[SeriesPoint] {
        &self.data
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarOptions {
    pub show: bool,
    pub horizontal: bool,
    pub shadow_size: u32,
    pub bar_width: f64,
    pub stacked: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    pub color: &'static str,
    pub vertical_lines: bool,
    pub horizontal_lines: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    pub min: Option<f64>,
    pub no_ticks: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_angle: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarPlot {
    pub series: Vec<DataSeries>,
    pub lines: bool,
    pub points: bool,
    pub bars: BarOptions,
    pub grid: GridOptions,
    pub legend_background: &'static str,
    pub mouse_track: bool,
    pub x_axis: AxisOptions,
    pub y_axis: AxisOptions,
    #[serde(skip)]
    pub ticks: TickFormatter,
}

impl BarPlot {
    pub fn from_prepared(prepared: &PreparedBars, settings: &BarChartSettings, current_size: usize) -> Self {
        let vertical = settings.vertical_chart;
        let line = settings.line_chart;

        let series: Vec<DataSeries> = prepared
            .series
            .iter()
            .map(|(key, points)| match key {
                SeriesKey::Color(c) => DataSeries { data: points.to_vec(), color: Some(c.clone()), label: None },
                SeriesKey::Stack(slot) => DataSeries {
                    data: points.to_vec(),
                    color: None,
                    label: settings.stack_labels.get(*slot).map(|l| l.trim().to_string()),
                },
            })
            .collect();
        let series_count = prepared.series.len();

        let mut bar_width = settings.bar_width;
        if !(bar_width > 0.0 && bar_width <= 1.0) {
            bar_width = DEFAULT_BAR_WIDTH;
        }
        if !settings.stacked && series_count > 1 {
            bar_width /= series_count as f64 + 1.0;
        }

        let value_min = prepared.range.min.is_finite().then_some(prepared.range.min);
        let value_axis = |axis: AxisId, title: &str| AxisOptions {
            min: value_min,
            no_ticks: tick_count(vertical, axis, current_size, settings.tick_num),
            title: title.to_string(),
            labels_angle: None,
        };
        let category_axis = |axis: AxisId, title: &str| AxisOptions {
            min: None,
            no_ticks: tick_count(vertical, axis, current_size, settings.tick_num),
            title: title.to_string(),
            labels_angle: None,
        };
        let (mut x_axis, y_axis) = if vertical {
            (value_axis(AxisId::X, &settings.value_label), category_axis(AxisId::Y, &settings.group_label))
        } else {
            (category_axis(AxisId::X, &settings.group_label), value_axis(AxisId::Y, &settings.value_label))
        };
        x_axis.labels_angle = Some(45.0);

        let exponent_ticks = settings.axis_type == crate::config::AxisType::Logarithmic && !settings.stacked;

        Self {
            series,
            lines: line,
            points: line,
            bars: BarOptions {
                show: !line,
                horizontal: vertical,
                shadow_size: 0,
                bar_width,
                stacked: settings.stacked,
            },
            grid: GridOptions {
                color: GRID_COLOR,
                vertical_lines: vertical || line,
                horizontal_lines: !vertical || line,
            },
            legend_background: LEGEND_BACKGROUND,
            mouse_track: true,
            x_axis,
            y_axis,
            ticks: TickFormatter::new(&prepared.published, vertical, exponent_ticks),
        }
    }

    pub fn tick_label(&self, n: f64, axis: AxisId) -> String {
        self.ticks.format(n, axis)
    }

    pub fn track_label(&self, x: f64, y: f64) -> String {
        self.ticks.track_label(x, y)
    }

    pub fn series_data(&self) -> impl Iterator<Item = &[SeriesPoint]> {
        self.series.iter().map(AsRef::as_ref)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PiePlot {
    pub slices: Vec<PieSlice>,
    pub explode: u32,
    pub legend_position: &'static str,
    pub legend_background: &'static str,
    pub show_axis_labels: bool,
    pub mouse_track: bool,
}

impl PiePlot {
    pub fn from_aggregate(aggregate: &PieAggregate, settings: &PieChartSettings) -> Self {
        Self {
            slices: aggregate.slices.clone(),
            explode: settings.explode,
            legend_position: "se",
            legend_background: LEGEND_BACKGROUND,
            show_axis_labels: false,
            mouse_track: true,
        }
    }
}

/// What a view asks the backend to draw in one reconstruct.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawRequest<'a> {
    Bar(&'a BarPlot),
    Pie(&'a PiePlot),
}
