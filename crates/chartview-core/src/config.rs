// File: crates/chartview-core/src/config.rs
// Summary: View settings (serde, camelCase keys), accessor bindings, markup-attribute collection.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as Json};

use crate::error::{ChartError, Result};

/// Value-axis function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    Linear,
    Logarithmic,
}

impl FromStr for AxisType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "logarithmic" | "log" => Ok(Self::Logarithmic),
            _ => Err(ChartError::UnknownAxisType(s.to_string())),
        }
    }
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisType::Linear => f.write_str("linear"),
            AxisType::Logarithmic => f.write_str("logarithmic"),
        }
    }
}

impl<'de> Deserialize<'de> for AxisType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Settings recognized by the bar chart view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarChartSettings {
    pub plot_height: u32,
    pub plot_width: Option<u32>,
    pub x_axis_min: Option<f64>,
    pub x_axis_max: Option<f64>,
    pub axis_type: AxisType,
    pub value_label: String,
    pub group_label: String,
    /// Bar color used when no color key is bound.
    pub color: String,
    /// Id of a registered color coder.
    pub color_coder: Option<String>,
    /// Bars run horizontally and items go down the vertical axis.
    pub vertical_chart: bool,
    pub line_chart: bool,
    pub tick_num: Option<u32>,
    pub bar_width: f64,
    pub stacked: bool,
    #[serde(deserialize_with = "labels_list")]
    pub stack_labels: Vec<String>,
}

impl Default for BarChartSettings {
    fn default() -> Self {
        Self {
            plot_height: 400,
            plot_width: None,
            x_axis_min: None,
            x_axis_max: None,
            axis_type: AxisType::Linear,
            value_label: "x".to_string(),
            group_label: "y".to_string(),
            color: "#FF9000".to_string(),
            color_coder: None,
            vertical_chart: true,
            line_chart: false,
            tick_num: None,
            bar_width: 0.8,
            stacked: false,
            stack_labels: Vec::new(),
        }
    }
}

/// Settings recognized by the pie chart view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PieChartSettings {
    pub plot_height: u32,
    pub plot_width: Option<u32>,
    /// Separation between slices.
    pub explode: u32,
    /// Group slices below `cutoff * sum` into one "Others" slice.
    pub group: bool,
    pub cutoff: f64,
}

impl Default for PieChartSettings {
    fn default() -> Self {
        Self { plot_height: 400, plot_width: None, explode: 6, group: false, cutoff: 0.01 }
    }
}

/// How `{x, y}` tuples are read from an item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum XyBinding {
    /// One attribute yielding records `[number.., text]`.
    AxisData { attribute: String },
    /// One numeric attribute per stack slot plus a label attribute.
    Separate { values: Vec<String>, label: String },
}

/// Attribute bindings for the accessor chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bindings {
    pub proxy: Option<String>,
    pub xy: Option<XyBinding>,
    pub color_key: Option<String>,
}

impl Bindings {
    pub fn separate(values: &[&str], label: &str) -> Self {
        Self {
            xy: Some(XyBinding::Separate {
                values: values.iter().map(|s| s.to_string()).collect(),
                label: label.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn axis_data(attribute: &str) -> Self {
        Self {
            xy: Some(XyBinding::AxisData { attribute: attribute.to_string() }),
            ..Self::default()
        }
    }

    pub fn with_proxy(mut self, attribute: &str) -> Self {
        self.proxy = Some(attribute.to_string());
        self
    }

    pub fn with_color_key(mut self, attribute: &str) -> Self {
        self.color_key = Some(attribute.to_string());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartConfig {
    pub settings: BarChartSettings,
    pub bindings: Bindings,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieChartConfig {
    pub settings: PieChartSettings,
    pub bindings: Bindings,
}

impl BarChartConfig {
    pub fn new(settings: BarChartSettings, bindings: Bindings) -> Self {
        Self { settings, bindings }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Collect settings and bindings from `ex:`-prefixed markup attributes.
    pub fn from_markup_attributes(attrs: &HashMap<String, String>) -> Result<Self> {
        let (settings, bindings) = collect_markup(attrs, BAR_SETTING_KINDS, "groupedBy")?;
        Ok(Self { settings: serde_json::from_value(settings)?, bindings })
    }
}

impl PieChartConfig {
    pub fn new(settings: PieChartSettings, bindings: Bindings) -> Self {
        Self { settings, bindings }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_markup_attributes(attrs: &HashMap<String, String>) -> Result<Self> {
        let (settings, bindings) = collect_markup(attrs, PIE_SETTING_KINDS, "labels")?;
        Ok(Self { settings: serde_json::from_value(settings)?, bindings })
    }
}

#[derive(Clone, Copy, Debug)]
enum SettingKind {
    Int,
    Float,
    Bool,
    Text,
    List,
}

const BAR_SETTING_KINDS: &[(&str, SettingKind)] = &[
    ("plotHeight", SettingKind::Int),
    ("plotWidth", SettingKind::Int),
    ("xAxisMin", SettingKind::Float),
    ("xAxisMax", SettingKind::Float),
    ("axisType", SettingKind::Text),
    ("valueLabel", SettingKind::Text),
    ("groupLabel", SettingKind::Text),
    ("color", SettingKind::Text),
    ("colorCoder", SettingKind::Text),
    ("verticalChart", SettingKind::Bool),
    ("lineChart", SettingKind::Bool),
    ("tickNum", SettingKind::Int),
    ("barWidth", SettingKind::Float),
    ("stacked", SettingKind::Bool),
    ("stackLabels", SettingKind::List),
];

const PIE_SETTING_KINDS: &[(&str, SettingKind)] = &[
    ("plotHeight", SettingKind::Int),
    ("plotWidth", SettingKind::Int),
    ("explode", SettingKind::Int),
    ("group", SettingKind::Bool),
    ("cutoff", SettingKind::Float),
];

fn collect_markup(
    attrs: &HashMap<String, String>,
    kinds: &[(&str, SettingKind)],
    label_attr: &str,
) -> Result<(Json, Bindings)> {
    let mut settings = Map::new();
    for (name, kind) in kinds {
        let Some(raw) = markup_attr(attrs, name) else { continue };
        let value = match kind {
            SettingKind::Int => Json::from(raw.trim().parse::<u32>().map_err(|e| invalid(name, e))?),
            SettingKind::Float => Json::from(raw.trim().parse::<f64>().map_err(|e| invalid(name, e))?),
            SettingKind::Bool => Json::from(parse_bool(raw).ok_or_else(|| invalid(name, "expected true or false"))?),
            SettingKind::Text | SettingKind::List => Json::from(raw.to_string()),
        };
        settings.insert(name.to_string(), value);
    }

    let mut bindings = Bindings {
        proxy: markup_attr(attrs, "proxy").map(str::to_string),
        color_key: markup_attr(attrs, "colorKey").map(str::to_string),
        xy: None,
    };
    if let Some(attribute) = markup_attr(attrs, "axisData") {
        bindings.xy = Some(XyBinding::AxisData { attribute: attribute.to_string() });
    } else if let (Some(values), Some(label)) = (markup_attr(attrs, "values"), markup_attr(attrs, label_attr)) {
        bindings.xy = Some(XyBinding::Separate { values: split_list(values), label: label.trim().to_string() });
    }
    Ok((Json::Object(settings), bindings))
}

fn markup_attr<'a>(attrs: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    attrs
        .get(&format!("ex:{name}"))
        .or_else(|| attrs.get(name))
        .map(String::as_str)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(name: &str, reason: impl fmt::Display) -> ChartError {
    ChartError::InvalidSetting { name: name.to_string(), reason: reason.to_string() }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Accepts `"a, b, c"` or `["a", "b", "c"]`.
fn labels_list<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Labels {
        Joined(String),
        List(Vec<String>),
    }
    Ok(match Labels::deserialize(d)? {
        Labels::Joined(s) => split_list(&s),
        Labels::List(v) => v.into_iter().map(|s| s.trim().to_string()).collect(),
    })
}
