// File: crates/chartview-core/tests/series_builder.rs
// Purpose: Validate the bar pipeline: ranks, stack fan-out, log skipping, color keys, proxies.

use std::rc::Rc;

use chartview_core::color::{MIXED_COLOR, PALETTE};
use chartview_core::memory::MemoryDatabase;
use chartview_core::{
    AxisType, BarBuildOptions, BarChartSettings, Bindings, ColorClassifier, ColorCoder, DefaultColorCoder,
    PreparedBars, ResolvedAccessors, SeriesBuilder, SeriesKey, Value, XValue,
};

fn build(settings: &BarChartSettings, bindings: &Bindings, db: &MemoryDatabase, items: &[&str]) -> PreparedBars {
    let accessors = ResolvedAccessors::resolve(bindings).unwrap();
    let coder: Option<Rc<dyn ColorCoder>> =
        accessors.has_color_key().then(|| Rc::new(DefaultColorCoder::new()) as Rc<dyn ColorCoder>);
    let colors = ColorClassifier::new(coder, settings.color.clone());
    let builder = SeriesBuilder::new(BarBuildOptions::from_settings(settings), &accessors, db, &colors);
    builder.build(items.iter().map(|s| s.to_string()))
}

fn single_values(pairs: &[(&str, f64)]) -> MemoryDatabase {
    pairs.iter().fold(MemoryDatabase::new(), |db, (id, v)| {
        db.with_number(id, "value", *v).with_text(id, "label", &id.to_uppercase())
    })
}

#[test]
fn vertical_bars_rank_downwards() {
    let db = single_values(&[("a", 3.0), ("b", 7.0)]);
    let p = build(&BarChartSettings::default(), &Bindings::separate(&["value"], "label"), &db, &["a", "b", "c"]);

    assert_eq!(p.published.len(), 2);
    assert_eq!(p.unplottable, vec!["c".to_string()]);
    assert_eq!(p.visited(), 3);
    assert_eq!(p.published[0].z, 0.0);
    assert_eq!(p.published[1].z, -1.0);
    assert_eq!(p.published[1].y, "B");
    assert_eq!(p.published[1].items, vec!["b".to_string()]);

    let key = SeriesKey::Color("#FF9000".into());
    assert_eq!(p.series.len(), 1);
    assert_eq!(p.series.get(&key).unwrap(), &[[3.0, 0.0], [7.0, -1.0]]);
    assert_eq!((p.range.min, p.range.max), (3.0, 7.0));
}

#[test]
fn horizontal_bars_rank_upwards() {
    let settings = BarChartSettings { vertical_chart: false, ..Default::default() };
    let db = single_values(&[("a", 3.0), ("b", 7.0)]);
    let p = build(&settings, &Bindings::separate(&["value"], "label"), &db, &["a", "b"]);
    let key = SeriesKey::Color("#FF9000".into());
    assert_eq!(p.series.get(&key).unwrap(), &[[0.0, 3.0], [1.0, 7.0]]);
}

fn three_slot_db() -> MemoryDatabase {
    MemoryDatabase::new()
        .with_number("a", "v1", 3.0)
        .with_number("a", "v2", 4.0)
        .with_number("a", "v3", 5.0)
        .with_text("a", "label", "A")
}

#[test]
fn stacked_range_uses_slot_sums() {
    let settings = BarChartSettings { stacked: true, ..Default::default() };
    let p = build(&settings, &Bindings::separate(&["v1", "v2", "v3"], "label"), &three_slot_db(), &["a"]);

    assert_eq!(p.range.max, 12.0);
    assert_eq!(p.series.len(), 3);
    for (slot, v) in [3.0, 4.0, 5.0].into_iter().enumerate() {
        // Stacked slots share the item's rank.
        assert_eq!(p.series.get(&SeriesKey::Stack(slot)).unwrap(), &[[v, 0.0]]);
    }
    assert_eq!(p.published[0].x, XValue::Stack(vec![3.0, 4.0, 5.0]));
}

#[test]
fn stacked_mode_ignores_the_log_axis() {
    let settings = BarChartSettings { stacked: true, axis_type: AxisType::Logarithmic, ..Default::default() };
    let p = build(&settings, &Bindings::separate(&["v1", "v2", "v3"], "label"), &three_slot_db(), &["a"]);
    // Raw values and raw sums, not log10.
    assert_eq!(p.range.max, 12.0);
    assert_eq!(p.series.get(&SeriesKey::Stack(2)).unwrap(), &[[5.0, 0.0]]);
    assert_eq!(p.published[0].scaled_x, vec![Some(3.0), Some(4.0), Some(5.0)]);
}

#[test]
fn unstacked_slots_fan_out_across_the_rank() {
    let p = build(
        &BarChartSettings::default(),
        &Bindings::separate(&["v1", "v2", "v3"], "label"),
        &three_slot_db(),
        &["a"],
    );
    assert_eq!(p.series.get(&SeriesKey::Stack(0)).unwrap(), &[[3.0, 0.25]]);
    assert_eq!(p.series.get(&SeriesKey::Stack(1)).unwrap(), &[[4.0, 0.0]]);
    assert_eq!(p.series.get(&SeriesKey::Stack(2)).unwrap(), &[[5.0, -0.25]]);
    assert_eq!((p.range.min, p.range.max), (3.0, 5.0));
    // Fan-out positions still resolve to the item.
    assert_eq!(p.index_for_rank(0.25), Some(0));
    assert_eq!(p.index_for_rank(-0.25), Some(0));
}

#[test]
fn fan_out_is_centred_on_each_base_rank() {
    let db = three_slot_db()
        .with_number("b", "v1", 1.0)
        .with_number("b", "v2", 1.0)
        .with_number("b", "v3", 1.0)
        .with_text("b", "label", "B");
    for vertical in [true, false] {
        let settings = BarChartSettings { vertical_chart: vertical, ..Default::default() };
        let p = build(&settings, &Bindings::separate(&["v1", "v2", "v3"], "label"), &db, &["a", "b"]);
        for (i, datum) in p.published.iter().enumerate() {
            let ranks: Vec<f64> = (0..3)
                .map(|slot| {
                    let point = p.series.get(&SeriesKey::Stack(slot)).unwrap()[i];
                    if vertical { point[1] } else { point[0] }
                })
                .collect();
            let mean = ranks.iter().sum::<f64>() / 3.0;
            assert!((mean - datum.z).abs() < 1e-12, "ranks {ranks:?} around {}", datum.z);
            for r in ranks {
                assert_eq!(p.index_for_rank(r), Some(i));
            }
        }
    }
}

#[test]
fn two_slots_sit_a_third_either_side() {
    let db = MemoryDatabase::new()
        .with_number("a", "v1", 2.0)
        .with_number("a", "v2", 6.0)
        .with_text("a", "label", "A");
    let settings = BarChartSettings { vertical_chart: false, ..Default::default() };
    let p = build(&settings, &Bindings::separate(&["v1", "v2"], "label"), &db, &["a"]);
    let third = 1.0 / 3.0;
    assert!((p.series.get(&SeriesKey::Stack(0)).unwrap()[0][0] + 0.5 * third).abs() < 1e-12);
    assert!((p.series.get(&SeriesKey::Stack(1)).unwrap()[0][0] - 0.5 * third).abs() < 1e-12);
}

#[test]
fn log_axis_skips_non_positive_values_but_publishes_the_item() {
    let settings = BarChartSettings { axis_type: AxisType::Logarithmic, ..Default::default() };
    let db = single_values(&[("a", 100.0), ("b", 0.0), ("c", 10.0)]);
    let p = build(&settings, &Bindings::separate(&["value"], "label"), &db, &["a", "b", "c"]);

    assert_eq!(p.published.len(), 3);
    assert!(p.unplottable.is_empty());
    assert_eq!(p.published[1].scaled_x, vec![None]);
    assert_eq!(p.series.point_count(), 2);
    assert!(p.range.min.is_finite() && p.range.max.is_finite());
    assert_eq!((p.range.min, p.range.max), (1.0, 2.0));
}

#[test]
fn configured_bounds_seed_the_range() {
    let settings = BarChartSettings { x_axis_min: Some(0.0), ..Default::default() };
    let db = single_values(&[("a", 3.0), ("b", 7.0)]);
    let p = build(&settings, &Bindings::separate(&["value"], "label"), &db, &["a", "b"]);
    assert_eq!((p.range.min, p.range.max), (0.0, 7.0));
}

#[test]
fn no_plottable_items_leaves_range_unset() {
    let db = MemoryDatabase::new();
    let p = build(&BarChartSettings::default(), &Bindings::separate(&["value"], "label"), &db, &["x", "y"]);
    assert!(p.published.is_empty());
    assert_eq!(p.unplottable.len(), 2);
    assert!(!p.range.is_finite());
    assert!(p.series.is_empty());
}

#[test]
fn color_keys_group_series_by_color() {
    let db = single_values(&[("a", 1.0), ("b", 2.0), ("c", 3.0)])
        .with_text("a", "kind", "x")
        .with_text("b", "kind", "y")
        .with_text("c", "kind", "x")
        .with_text("c", "kind", "y");
    let bindings = Bindings::separate(&["value"], "label").with_color_key("kind");
    let p = build(&BarChartSettings::default(), &bindings, &db, &["a", "b", "c"]);

    let colors: Vec<&str> = p.published.iter().map(|d| d.color.as_str()).collect();
    assert_eq!(colors, vec![PALETTE[0], PALETTE[1], MIXED_COLOR]);
    assert_eq!(p.series.len(), 3);
    assert!(p.flags.mixed);
    assert_eq!(p.published[2].color_keys, Some(vec!["x".to_string(), "y".to_string()]));
}

#[test]
fn proxy_redirects_value_lookup() {
    let db = MemoryDatabase::new()
        .with_text("p", "source", "q")
        .with_number("q", "value", 9.0)
        .with_text("q", "label", "Q");
    let bindings = Bindings::separate(&["value"], "label").with_proxy("source");
    let p = build(&BarChartSettings::default(), &bindings, &db, &["p"]);
    assert_eq!(p.published.len(), 1);
    assert_eq!(p.published[0].y, "Q");
    assert_eq!(p.published[0].items, vec!["p".to_string()]);
}

#[test]
fn record_binding_reads_stacked_tuples() {
    let db = MemoryDatabase::new().with_record(
        "r",
        "data",
        vec![Value::Number(2.0), Value::Number(3.0), Value::Text("R".into())],
    );
    let p = build(&BarChartSettings::default(), &Bindings::axis_data("data"), &db, &["r"]);
    assert_eq!(p.published[0].x, XValue::Stack(vec![2.0, 3.0]));
    assert_eq!(p.series.len(), 2);
}

#[test]
fn every_tuple_widens_the_range_and_the_last_is_plotted() {
    let db = MemoryDatabase::new()
        .with_number("a", "value", 4.0)
        .with_number("a", "value", 80.0)
        .with_text("a", "label", "A");
    let p = build(&BarChartSettings::default(), &Bindings::separate(&["value"], "label"), &db, &["a"]);
    assert_eq!(p.published.len(), 1);
    assert_eq!(p.published[0].x, XValue::Scalar(80.0));
    assert_eq!(p.published[0].scaled_x, vec![Some(80.0)]);
    assert_eq!(p.series.point_count(), 1);
    assert_eq!(p.series.get(&SeriesKey::Color("#FF9000".into())).unwrap(), &[[80.0, 0.0]]);
    assert!(p.range.min <= 4.0 && p.range.max >= 80.0, "range {:?}", p.range);
}

#[test]
fn index_for_rank_is_stable_for_published_positions() {
    let db = single_values(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
    let p = build(&BarChartSettings::default(), &Bindings::separate(&["value"], "label"), &db, &["a", "b", "c"]);
    for (i, d) in p.published.iter().enumerate() {
        assert_eq!(p.index_for_rank(d.z), Some(i));
    }
    assert_eq!(p.index_for_rank(-3.0), None);
    assert_eq!(p.index_for_rank(f64::NAN), None);
}
