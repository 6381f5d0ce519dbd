// File: crates/chartview-core/src/host.rs
// Summary: Host collaborator traits (collection, database, color coder, renderer, presenter, diagnostics).

use std::collections::{BTreeSet, HashMap};
use std::rc::{Rc, Weak};

use crate::color::{ColorCodingFlags, LegendCase, LegendEntry, LegendStyle};
use crate::error::ChartError;
use crate::render::DrawRequest;
use crate::types::{ItemId, Value};

/// Handle returned by [`ItemCollection::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Receives item-set change notifications.
pub trait ItemsChangedListener {
    fn on_items_changed(&self);
}

/// The filtered ("restricted") item set a view plots.
pub trait ItemCollection {
    fn count_restricted_items(&self) -> usize;
    /// Items currently passing the active filters, in a stable order.
    fn restricted_items(&self) -> Vec<ItemId>;
    fn subscribe(&self, listener: Weak<dyn ItemsChangedListener>) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
}

/// Property lookup on host items.
pub trait Database {
    fn values(&self, item: &str, property: &str) -> Vec<Value>;
}

/// Maps a set of category keys to a display color.
pub trait ColorCoder {
    /// Color for one item's key set; updates `flags` with mixed/missing/others.
    fn translate_set(&self, keys: &BTreeSet<String>, flags: &mut ColorCodingFlags) -> String;
    /// Color already assigned to `key`, if any.
    fn translate(&self, key: &str) -> Option<String>;
    fn mixed_case(&self) -> LegendCase;
    fn missing_case(&self) -> LegendCase;
    fn others_case(&self) -> LegendCase;
    fn is_gradient(&self) -> bool {
        false
    }
}

/// Plotting backend. Drawing itself is the backend's business.
pub trait ChartRenderer {
    /// Drop whatever was rendered by the previous pass.
    fn clear(&mut self);
    fn draw(&mut self, request: &DrawRequest) -> anyhow::Result<()>;
}

/// Legend, summary and popup chrome around the plot.
pub trait Presenter {
    fn clear_legend(&mut self);
    fn show_legend(&mut self, entries: &[LegendEntry], style: LegendStyle);
    /// `total` items were visited; `unplottable` of them had no values.
    fn set_unplottable_message(&mut self, total: usize, unplottable: &[ItemId]);
    fn open_popup(&mut self, page_x: f64, page_y: f64, items: &[ItemId]);
    fn close_popup(&mut self);
}

/// Sink for errors the host must see.
pub trait Diagnostics {
    fn report(&self, error: &ChartError);
}

/// Everything a view needs from the host besides its own renderer/presenter.
#[derive(Clone)]
pub struct UiContext {
    pub collection: Rc<dyn ItemCollection>,
    pub database: Rc<dyn Database>,
    pub diagnostics: Rc<dyn Diagnostics>,
    color_coders: HashMap<String, Rc<dyn ColorCoder>>,
}

impl UiContext {
    pub fn new(
        collection: Rc<dyn ItemCollection>,
        database: Rc<dyn Database>,
        diagnostics: Rc<dyn Diagnostics>,
    ) -> Self {
        Self { collection, database, diagnostics, color_coders: HashMap::new() }
    }

    pub fn with_color_coder(mut self, id: impl Into<String>, coder: Rc<dyn ColorCoder>) -> Self {
        self.color_coders.insert(id.into(), coder);
        self
    }

    pub fn color_coder(&self, id: &str) -> Option<Rc<dyn ColorCoder>> {
        self.color_coders.get(id).cloned()
    }
}
