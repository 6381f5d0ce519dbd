// File: crates/demo/src/main.rs
// Summary: Demo loads items from CSV, builds bar and pie views over them and writes draw requests to JSON.

use anyhow::{Context, Result};
use chartview_core::memory::{CollectingDiagnostics, MemoryCollection, MemoryDatabase};
use chartview_core::{
    BarChartConfig, BarChartSettings, BarChartView, Bindings, ChartRenderer, ClickEvent, DrawRequest, ItemId,
    LegendEntry, LegendStyle, PieChartConfig, PieChartSettings, PieChartView, Presenter, UiContext, Value,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Accept paths from CLI or fall back to the bundled sample
    let mut args = std::env::args().skip(1);
    let items_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_items.csv"));
    let settings_path = args.next().map(PathBuf::from);

    let table = load_items_csv(&items_path)
        .with_context(|| format!("failed to load CSV '{}'", items_path.display()))?;
    println!("Loaded {} items with columns {:?}", table.ids.len(), table.numeric);
    if table.numeric.is_empty() {
        anyhow::bail!("no numeric columns found in '{}'", items_path.display());
    }

    let bar_config = match &settings_path {
        Some(p) => {
            let text = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            BarChartConfig::from_json(&text).with_context(|| format!("parsing settings {}", p.display()))?
        }
        None => default_bar_config(&table),
    };
    let pie_config = PieChartConfig::new(
        PieChartSettings { group: true, cutoff: 0.05, ..Default::default() },
        Bindings::separate(&[table.numeric[0].as_str()], &table.label),
    );

    let collection = Rc::new(MemoryCollection::new(table.ids.clone()));
    let diagnostics = Rc::new(CollectingDiagnostics::default());
    let ui = UiContext::new(collection.clone(), Rc::new(table.db), diagnostics.clone());

    let out_dir = PathBuf::from("target/out");
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let stem = items_path.file_stem().and_then(|s| s.to_str()).unwrap_or("items").to_string();

    let bars = BarChartView::create(
        bar_config,
        ui.clone(),
        Box::new(JsonFileRenderer::new(&out_dir, &stem, "bars")),
        Box::new(ConsolePresenter::new("bars")),
    )?;
    let pie = PieChartView::create(
        pie_config,
        ui,
        Box::new(JsonFileRenderer::new(&out_dir, &stem, "pie")),
        Box::new(ConsolePresenter::new("pie")),
    )?;
    let (height, width) = bars.plot_size();
    println!("Plot container: height {height}px, width {}", width.map_or("auto".to_string(), |w| format!("{w}px")));

    // Simulate a click halfway along the first plotted bar
    let target = bars.prepared().and_then(|p| {
        p.published
            .iter()
            .find_map(|d| d.scaled_x.iter().flatten().next().map(|v| (d.z, *v)))
    });
    if let Some((rank, value)) = target {
        let vertical = bars.settings().vertical_chart;
        let (x, y) = if vertical { (value / 2.0, rank) } else { (rank, value / 2.0) };
        match bars.handle_click(ClickEvent::in_plot(x, y, 120.0, 80.0)) {
            Some(index) => println!("Click at ({x}, {y}) opened item #{index}"),
            None => println!("Click at ({x}, {y}) hit nothing"),
        }
        bars.handle_click(ClickEvent::outside());
    }

    // Narrow the collection; both views reconstruct on the notification
    if let Some(first) = table.ids.first().cloned() {
        println!("Filtering out '{first}'");
        collection.set_filter(move |id| id != first);
    }
    if let Some(agg) = pie.aggregate() {
        println!("Pie: {} slices, grouped {:?}", agg.slices.len(), agg.grouped_labels);
    }

    for message in diagnostics.messages() {
        eprintln!("diagnostic: {message}");
    }
    bars.dispose();
    pie.dispose();
    Ok(())
}

struct ItemTable {
    ids: Vec<ItemId>,
    label: String,
    numeric: Vec<String>,
    db: MemoryDatabase,
}

/// Load items: first column is the item id, every other column a property.
/// Numeric cells become numbers, blank cells are left out.
fn load_items_csv(path: &Path) -> Result<ItemTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect::<Vec<_>>();
    tracing::debug!(?headers, "csv headers");
    if headers.len() < 2 {
        anyhow::bail!("expected an id column and at least one property column");
    }

    let mut db = MemoryDatabase::new();
    let mut ids = Vec::new();
    let mut numeric = vec![true; headers.len()];
    for rec in rdr.records() {
        let rec = rec?;
        let Some(id) = rec.get(0).map(str::trim).filter(|s| !s.is_empty()) else { continue };
        for (i, cell) in rec.iter().enumerate().skip(1) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let value = match cell.parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => {
                    numeric[i] = false;
                    Value::Text(cell.to_string())
                }
            };
            db.insert(id, headers[i].clone(), value);
        }
        ids.push(id.to_string());
    }

    let label = ["label", "name"]
        .iter()
        .find_map(|want| headers.iter().find(|h| h.eq_ignore_ascii_case(want)).cloned())
        .unwrap_or_else(|| headers[0].clone());
    if label == headers[0] {
        // Fall back to labelling items by their id.
        for id in &ids {
            db.insert(id.as_str(), label.clone(), Value::Text(id.clone()));
        }
    }
    let numeric = headers
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(i, h)| numeric[*i] && **h != label)
        .map(|(_, h)| h.clone())
        .collect();
    Ok(ItemTable { ids, label, numeric, db })
}

fn default_bar_config(table: &ItemTable) -> BarChartConfig {
    let columns: Vec<&str> = table.numeric.iter().map(String::as_str).collect();
    let settings = BarChartSettings {
        stacked: columns.len() > 1,
        stack_labels: table.numeric.clone(),
        value_label: "Value".into(),
        group_label: table.label.clone(),
        ..Default::default()
    };
    BarChartConfig::new(settings, Bindings::separate(&columns, &table.label))
}

/// Writes every draw request to `<out>/<stem>_<suffix>.json`.
struct JsonFileRenderer {
    path: PathBuf,
    draws: usize,
}

impl JsonFileRenderer {
    fn new(out_dir: &Path, stem: &str, suffix: &str) -> Self {
        let short = stem.split('_').take(3).collect::<Vec<_>>().join("_");
        Self { path: out_dir.join(format!("chart_{short}_{suffix}.json")), draws: 0 }
    }
}

impl ChartRenderer for JsonFileRenderer {
    fn clear(&mut self) {
        tracing::trace!(path = %self.path.display(), "clear");
    }

    fn draw(&mut self, request: &DrawRequest) -> anyhow::Result<()> {
        let file = File::create(&self.path).with_context(|| format!("creating {}", self.path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), request)
            .with_context(|| format!("writing {}", self.path.display()))?;
        self.draws += 1;
        println!("Wrote {} (draw #{})", self.path.display(), self.draws);
        Ok(())
    }
}

/// Prints legend, summary and popup chrome to stdout.
struct ConsolePresenter {
    name: &'static str,
}

impl ConsolePresenter {
    fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Presenter for ConsolePresenter {
    fn clear_legend(&mut self) {}

    fn show_legend(&mut self, entries: &[LegendEntry], style: LegendStyle) {
        let rows = entries.iter().map(|e| format!("{}={}", e.label, e.color)).collect::<Vec<_>>();
        println!("[{}] legend ({style:?}): {}", self.name, rows.join(", "));
    }

    fn set_unplottable_message(&mut self, total: usize, unplottable: &[ItemId]) {
        if unplottable.is_empty() {
            println!("[{}] {total} items plotted", self.name);
        } else {
            println!(
                "[{}] {} of {total} items could not be plotted: {}",
                self.name,
                unplottable.len(),
                unplottable.join(", ")
            );
        }
    }

    fn open_popup(&mut self, page_x: f64, page_y: f64, items: &[ItemId]) {
        println!("[{}] popup at ({page_x}, {page_y}): {}", self.name, items.join(", "));
    }

    fn close_popup(&mut self) {
        println!("[{}] popup closed", self.name);
    }
}
