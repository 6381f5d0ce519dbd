// File: crates/chartview-core/src/memory.rs
// Summary: In-memory host implementations (collection, database, recording renderer/presenter).
// Notes:
// - Used by the demo binaries and the integration tests; single-threaded like the views.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use anyhow::bail;

use crate::color::{LegendEntry, LegendStyle};
use crate::error::ChartError;
use crate::host::{ChartRenderer, Database, Diagnostics, ItemCollection, ItemsChangedListener, ListenerId, Presenter};
use crate::render::{BarPlot, DrawRequest, PiePlot};
use crate::types::{ItemId, Value};

/// Item collection with an optional restriction filter.
#[derive(Default)]
pub struct MemoryCollection {
    items: RefCell<Vec<ItemId>>,
    filter: RefCell<Option<Box<dyn Fn(&str) -> bool>>>,
    listeners: RefCell<Vec<(ListenerId, Weak<dyn ItemsChangedListener>)>>,
    next_id: Cell<u64>,
}

impl MemoryCollection {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        let c = Self::default();
        *c.items.borrow_mut() = items.into_iter().map(Into::into).collect();
        c
    }

    /// Replace the item set and notify listeners.
    pub fn set_items<I, S>(&self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        *self.items.borrow_mut() = items.into_iter().map(Into::into).collect();
        self.notify();
    }

    /// Restrict the visible items and notify listeners.
    pub fn set_filter(&self, filter: impl Fn(&str) -> bool + 'static) {
        *self.filter.borrow_mut() = Some(Box::new(filter));
        self.notify();
    }

    pub fn clear_filter(&self) {
        *self.filter.borrow_mut() = None;
        self.notify();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Fire `on_items_changed` on every live listener; dead ones are pruned.
    pub fn notify(&self) {
        // Listeners may unsubscribe while being notified.
        let snapshot: Vec<Weak<dyn ItemsChangedListener>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|(_, w)| w.strong_count() > 0);
            listeners.iter().map(|(_, w)| w.clone()).collect()
        };
        tracing::trace!(listeners = snapshot.len(), "notify items changed");
        for listener in snapshot.iter().filter_map(Weak::upgrade) {
            listener.on_items_changed();
        }
    }
}

impl ItemCollection for MemoryCollection {
    fn count_restricted_items(&self) -> usize {
        self.restricted_items().len()
    }

    fn restricted_items(&self) -> Vec<ItemId> {
        let filter = self.filter.borrow();
        self.items
            .borrow()
            .iter()
            .filter(|id| filter.as_ref().map_or(true, |f| f(id.as_str())))
            .cloned()
            .collect()
    }

    fn subscribe(&self, listener: Weak<dyn ItemsChangedListener>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(l, _)| *l != id);
    }
}

/// Property values keyed by `(item, property)`.
#[derive(Clone, Debug, Default)]
pub struct MemoryDatabase {
    values: HashMap<(ItemId, String), Vec<Value>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: impl Into<ItemId>, property: impl Into<String>, value: Value) {
        self.values.entry((item.into(), property.into())).or_default().push(value);
    }

    pub fn with_number(mut self, item: &str, property: &str, n: f64) -> Self {
        self.insert(item, property, Value::Number(n));
        self
    }

    pub fn with_text(mut self, item: &str, property: &str, s: &str) -> Self {
        self.insert(item, property, Value::Text(s.to_string()));
        self
    }

    pub fn with_record(mut self, item: &str, property: &str, fields: Vec<Value>) -> Self {
        self.insert(item, property, Value::Record(fields));
        self
    }
}

impl Database for MemoryDatabase {
    fn values(&self, item: &str, property: &str) -> Vec<Value> {
        self.values.get(&(item.to_string(), property.to_string())).cloned().unwrap_or_default()
    }
}

/// Owned copy of a draw request.
#[derive(Clone, Debug, PartialEq)]
pub enum Drawn {
    Bar(BarPlot),
    Pie(PiePlot),
}

#[derive(Debug, Default)]
pub struct RenderLog {
    pub clears: usize,
    pub draws: Vec<Drawn>,
    /// Plot currently on screen (cleared by `clear`).
    pub current: Option<Drawn>,
}

impl RenderLog {
    pub fn last_bar(&self) -> Option<&BarPlot> {
        match self.draws.last()? {
            Drawn::Bar(p) => Some(p),
            Drawn::Pie(_) => None,
        }
    }

    pub fn last_pie(&self) -> Option<&PiePlot> {
        match self.draws.last()? {
            Drawn::Pie(p) => Some(p),
            Drawn::Bar(_) => None,
        }
    }
}

/// Renderer that records every request into a shared log.
pub struct RecordingRenderer {
    log: Rc<RefCell<RenderLog>>,
    fail_with: Option<String>,
}

impl RecordingRenderer {
    pub fn new() -> (Self, Rc<RefCell<RenderLog>>) {
        let log = Rc::new(RefCell::new(RenderLog::default()));
        (Self { log: Rc::clone(&log), fail_with: None }, log)
    }

    /// Make every `draw` fail with `message` after recording the request.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }
}

impl ChartRenderer for RecordingRenderer {
    fn clear(&mut self) {
        let mut log = self.log.borrow_mut();
        log.clears += 1;
        log.current = None;
    }

    fn draw(&mut self, request: &DrawRequest) -> anyhow::Result<()> {
        let drawn = match request {
            DrawRequest::Bar(p) => Drawn::Bar((*p).clone()),
            DrawRequest::Pie(p) => Drawn::Pie((*p).clone()),
        };
        let mut log = self.log.borrow_mut();
        log.draws.push(drawn.clone());
        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }
        log.current = Some(drawn);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PresenterLog {
    pub legend: Option<(Vec<LegendEntry>, LegendStyle)>,
    pub legend_clears: usize,
    /// Last `(total, unplottable)` summary.
    pub summary: Option<(usize, Vec<ItemId>)>,
    pub popup: Option<(f64, f64, Vec<ItemId>)>,
    pub popups_opened: usize,
}

/// Presenter that records legend, summary and popup state into a shared log.
pub struct RecordingPresenter {
    log: Rc<RefCell<PresenterLog>>,
}

impl RecordingPresenter {
    pub fn new() -> (Self, Rc<RefCell<PresenterLog>>) {
        let log = Rc::new(RefCell::new(PresenterLog::default()));
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl Presenter for RecordingPresenter {
    fn clear_legend(&mut self) {
        let mut log = self.log.borrow_mut();
        log.legend = None;
        log.legend_clears += 1;
    }

    fn show_legend(&mut self, entries: &[LegendEntry], style: LegendStyle) {
        self.log.borrow_mut().legend = Some((entries.to_vec(), style));
    }

    fn set_unplottable_message(&mut self, total: usize, unplottable: &[ItemId]) {
        self.log.borrow_mut().summary = Some((total, unplottable.to_vec()));
    }

    fn open_popup(&mut self, page_x: f64, page_y: f64, items: &[ItemId]) {
        let mut log = self.log.borrow_mut();
        log.popup = Some((page_x, page_y, items.to_vec()));
        log.popups_opened += 1;
    }

    fn close_popup(&mut self) {
        self.log.borrow_mut().popup = None;
    }
}

/// Diagnostics sink that keeps the rendered error messages.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    messages: RefCell<Vec<String>>,
}

impl CollectingDiagnostics {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, error: &ChartError) {
        self.messages.borrow_mut().push(error.to_string());
    }
}
