// File: crates/chartview-examples/src/bin/bars.rs
// Summary: Minimal example that builds a stacked bar chart from inline items and writes it as JSON.

use std::rc::Rc;

use anyhow::Context;
use chartview_core::memory::{CollectingDiagnostics, MemoryCollection, MemoryDatabase, RecordingPresenter, RecordingRenderer};
use chartview_core::{AxisId, BarChartConfig, BarChartView, UiContext};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Three regions, two quarters each
    let db = [("north", 12.0, 15.0), ("south", 30.0, 22.0), ("east", 45.0, 40.0)].iter().fold(
        MemoryDatabase::new(),
        |db, (id, q1, q2)| db.with_number(id, "q1", *q1).with_number(id, "q2", *q2).with_text(id, "name", id),
    );
    let config = BarChartConfig::from_json(
        r#"{
            "settings": { "stacked": true, "stackLabels": "Q1, Q2", "valueLabel": "Units", "groupLabel": "Region" },
            "bindings": { "xy": { "kind": "separate", "values": ["q1", "q2"], "label": "name" } }
        }"#,
    )?;

    let collection = Rc::new(MemoryCollection::new(["north", "south", "east"]));
    let ui = UiContext::new(collection, Rc::new(db), Rc::new(CollectingDiagnostics::default()));
    let (renderer, log) = RecordingRenderer::new();
    let (presenter, _) = RecordingPresenter::new();
    let view = BarChartView::create(config, ui, Box::new(renderer), Box::new(presenter))?;

    let log = log.borrow();
    let plot = log.last_bar().context("nothing was drawn")?;
    for n in [0.0, -1.0, -2.0] {
        println!("tick {n}: {}", plot.tick_label(n, AxisId::Y));
    }

    let out = std::path::PathBuf::from("target/out/example_bars.json");
    if let Some(dir) = out.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&out, serde_json::to_string_pretty(plot)?)?;
    println!("Wrote {}", out.display());

    drop(log);
    view.dispose();
    Ok(())
}
