// File: crates/chartview-core/tests/pie.rs
// Purpose: Validate pie slices, "Others" grouping and unplottable accounting.

use chartview_core::memory::MemoryDatabase;
use chartview_core::pie::{Grouping, OTHERS_LABEL};
use chartview_core::{Bindings, PieAggregate, PieAggregator, PieChartSettings, ResolvedAccessors};

fn db() -> MemoryDatabase {
    [("a", 50.0), ("b", 30.0), ("c", 1.0), ("d", 1.0), ("e", 1.0)]
        .iter()
        .fold(MemoryDatabase::new(), |db, (id, v)| db.with_number(id, "count", *v).with_text(id, "name", id))
}

fn aggregate(grouping: Option<Grouping>, items: &[&str]) -> PieAggregate {
    let accessors = ResolvedAccessors::resolve(&Bindings::separate(&["count"], "name")).unwrap();
    let db = db();
    let items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
    PieAggregator::new(&accessors, &db, grouping).aggregate(&items)
}

#[test]
fn one_slice_per_item_without_grouping() {
    let agg = aggregate(None, &["a", "b", "c", "d", "e"]);
    assert_eq!(agg.slices.len(), 5);
    assert_eq!(agg.slices[0].label, "a");
    assert_eq!(agg.slices[0].data(), [[0.0, 50.0]]);
    assert_eq!(agg.sum, None);
    assert!(agg.grouped_labels.is_empty());
}

#[test]
fn small_slices_grouped_into_others() {
    let agg = aggregate(Some(Grouping { cutoff: 0.05 }), &["a", "b", "c", "d", "e"]);
    let labels: Vec<&str> = agg.slices.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["a", "b", OTHERS_LABEL]);
    assert_eq!(agg.slices[2].value, 3.0);
    assert_eq!(agg.sum, Some(83.0));
    assert_eq!(agg.grouped_labels, vec!["c", "d", "e"]);
    // Grouped items are still published.
    assert_eq!(agg.published.len(), 5);
}

#[test]
fn no_others_slice_when_nothing_is_below_cutoff() {
    let agg = aggregate(Some(Grouping { cutoff: 0.001 }), &["a", "b", "c"]);
    assert_eq!(agg.slices.len(), 3);
    assert!(agg.slices.iter().all(|s| s.label != OTHERS_LABEL));
}

#[test]
fn missing_values_are_unplottable() {
    let agg = aggregate(Some(Grouping { cutoff: 0.05 }), &["a", "zz", "b"]);
    assert_eq!(agg.unplottable, vec!["zz".to_string()]);
    assert_eq!(agg.visited(), 3);
    assert_eq!(agg.sum, Some(80.0));
}

#[test]
fn grouping_follows_settings() {
    assert_eq!(Grouping::from_settings(&PieChartSettings::default()), None);
    let settings = PieChartSettings { group: true, cutoff: 0.1, ..Default::default() };
    assert_eq!(Grouping::from_settings(&settings), Some(Grouping { cutoff: 0.1 }));
}
