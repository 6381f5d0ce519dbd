// File: crates/chartview-core/src/lib.rs
// Summary: Core library entry point; exports the bar/pie chart views and their data pipeline.

pub mod accessor;
pub mod axis;
pub mod bar_view;
pub mod color;
pub mod config;
pub mod error;
pub mod hit;
pub mod host;
pub mod memory;
pub mod pie;
pub mod pie_view;
pub mod render;
pub mod scale;
pub mod series;
pub mod ticks;
pub mod types;
mod view;

pub use accessor::{ItemAccessor, ResolvedAccessors};
pub use axis::{nice_interval, AxisRange};
pub use bar_view::BarChartView;
pub use color::{ColorClassifier, ColorCodingFlags, DefaultColorCoder, LegendCase, LegendEntry, LegendStyle};
pub use config::{AxisType, BarChartConfig, BarChartSettings, Bindings, PieChartConfig, PieChartSettings, XyBinding};
pub use error::{ChartError, Result, ScaleError};
pub use hit::{Hit, HitTester};
pub use host::{ChartRenderer, ColorCoder, Database, Diagnostics, ItemCollection, Presenter, UiContext};
pub use pie::{PieAggregate, PieAggregator, PieSlice};
pub use pie_view::PieChartView;
pub use render::{BarPlot, DataSeries, DrawRequest, PiePlot};
pub use scale::AxisScaler;
pub use series::{BarBuildOptions, PreparedBars, SeriesBuilder, SeriesKey};
pub use ticks::TickFormatter;
pub use types::{AxisDatum, AxisId, AxisTuple, ItemId, SeriesPoint, Value, XValue};
pub use view::ClickEvent;
