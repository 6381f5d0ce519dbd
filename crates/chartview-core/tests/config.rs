// File: crates/chartview-core/tests/config.rs
// Purpose: Validate settings defaults, JSON loading and markup attribute collection.

use std::collections::HashMap;

use chartview_core::{
    AxisType, BarChartConfig, BarChartSettings, ChartError, PieChartConfig, PieChartSettings, XyBinding,
};

fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn bar_defaults() {
    let s = BarChartSettings::default();
    assert_eq!(s.plot_height, 400);
    assert_eq!(s.axis_type, AxisType::Linear);
    assert!(s.vertical_chart);
    assert!(!s.line_chart && !s.stacked);
    assert_eq!(s.color, "#FF9000");
    assert_eq!(s.bar_width, 0.8);

    let p = PieChartSettings::default();
    assert_eq!((p.explode, p.group, p.cutoff), (6, false, 0.01));
}

#[test]
fn axis_type_parsing() {
    assert_eq!("linear".parse::<AxisType>().unwrap(), AxisType::Linear);
    assert_eq!("LOG".parse::<AxisType>().unwrap(), AxisType::Logarithmic);
    assert_eq!(" logarithmic ".parse::<AxisType>().unwrap(), AxisType::Logarithmic);
    assert!(matches!("cubic".parse::<AxisType>(), Err(ChartError::UnknownAxisType(_))));
    assert_eq!(AxisType::Logarithmic.to_string(), "logarithmic");
}

#[test]
fn bar_config_from_json() {
    let cfg = BarChartConfig::from_json(
        r#"{
            "settings": { "axisType": "log", "stacked": true, "stackLabels": "low, mid ,high", "tickNum": 4 },
            "bindings": { "xy": { "kind": "separate", "values": ["v1", "v2", "v3"], "label": "name" }, "colorKey": "kind" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.settings.axis_type, AxisType::Logarithmic);
    assert!(cfg.settings.stacked);
    assert_eq!(cfg.settings.stack_labels, vec!["low", "mid", "high"]);
    assert_eq!(cfg.settings.tick_num, Some(4));
    assert_eq!(cfg.settings.plot_height, 400);
    assert_eq!(cfg.bindings.color_key.as_deref(), Some("kind"));
    assert!(matches!(cfg.bindings.xy, Some(XyBinding::Separate { ref values, .. }) if values.len() == 3));
}

#[test]
fn stack_labels_accept_a_list() {
    let cfg = BarChartConfig::from_json(r#"{ "settings": { "stackLabels": [" a", "b "] } }"#).unwrap();
    assert_eq!(cfg.settings.stack_labels, vec!["a", "b"]);
}

#[test]
fn bad_json_settings_are_errors() {
    assert!(matches!(
        BarChartConfig::from_json(r#"{ "settings": { "axisType": "cubic" } }"#),
        Err(ChartError::Settings(_))
    ));
    assert!(BarChartConfig::from_json("not json").is_err());
}

#[test]
fn bar_markup_attributes() {
    let cfg = BarChartConfig::from_markup_attributes(&attrs(&[
        ("ex:axisType", "logarithmic"),
        ("ex:verticalChart", "false"),
        ("ex:barWidth", "0.5"),
        ("ex:plotWidth", "640"),
        ("ex:values", "v1, v2"),
        ("ex:groupedBy", "name"),
        ("ex:colorKey", "kind"),
        ("class", "ignored"),
    ]))
    .unwrap();
    assert_eq!(cfg.settings.axis_type, AxisType::Logarithmic);
    assert!(!cfg.settings.vertical_chart);
    assert_eq!(cfg.settings.bar_width, 0.5);
    assert_eq!(cfg.settings.plot_width, Some(640));
    assert_eq!(
        cfg.bindings.xy,
        Some(XyBinding::Separate { values: vec!["v1".into(), "v2".into()], label: "name".into() })
    );
    assert_eq!(cfg.bindings.color_key.as_deref(), Some("kind"));
}

#[test]
fn markup_axis_data_wins_over_separate_values() {
    let cfg = BarChartConfig::from_markup_attributes(&attrs(&[
        ("ex:axisData", "data"),
        ("ex:values", "v"),
        ("ex:groupedBy", "name"),
    ]))
    .unwrap();
    assert_eq!(cfg.bindings.xy, Some(XyBinding::AxisData { attribute: "data".into() }));
}

#[test]
fn markup_rejects_malformed_values() {
    let err = BarChartConfig::from_markup_attributes(&attrs(&[("ex:stacked", "maybe")])).unwrap_err();
    assert!(matches!(err, ChartError::InvalidSetting { ref name, .. } if name == "stacked"));

    let err = BarChartConfig::from_markup_attributes(&attrs(&[("ex:plotHeight", "tall")])).unwrap_err();
    assert!(matches!(err, ChartError::InvalidSetting { .. }));
}

#[test]
fn pie_markup_attributes() {
    let cfg = PieChartConfig::from_markup_attributes(&attrs(&[
        ("ex:group", "true"),
        ("ex:cutoff", "0.05"),
        ("ex:values", "count"),
        ("ex:labels", "name"),
    ]))
    .unwrap();
    assert!(cfg.settings.group);
    assert_eq!(cfg.settings.cutoff, 0.05);
    assert_eq!(
        cfg.bindings.xy,
        Some(XyBinding::Separate { values: vec!["count".into()], label: "name".into() })
    );
}
