// File: crates/chartview-core/src/view.rs
// Summary: Shared view lifecycle: change subscription, reconstruct dispatch, error reporting.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::ChartError;
use crate::host::{ItemCollection, ItemsChangedListener, ListenerId, UiContext};

/// Per-view state that can rebuild itself from the current item set.
pub(crate) trait Reconstruct {
    fn reconstruct(&mut self);
}

struct ChangeListener<S> {
    target: Weak<RefCell<S>>,
    view: &'static str,
}

impl<S: Reconstruct> ItemsChangedListener for ChangeListener<S> {
    fn on_items_changed(&self) {
        let Some(state) = self.target.upgrade() else { return };
        match state.try_borrow_mut() {
            Ok(mut s) => s.reconstruct(),
            Err(_) => tracing::warn!(view = self.view, "items changed during reconstruct; ignored"),
        };
    }
}

/// Subscription of a view to its collection. Detaches on `detach` or drop.
pub(crate) struct Attachment {
    collection: Rc<dyn ItemCollection>,
    id: Option<ListenerId>,
    // The collection only holds a weak reference.
    _listener: Rc<dyn ItemsChangedListener>,
}

impl Attachment {
    pub(crate) fn attach<S: Reconstruct + 'static>(
        collection: Rc<dyn ItemCollection>,
        state: &Rc<RefCell<S>>,
        view: &'static str,
    ) -> Self {
        let listener: Rc<dyn ItemsChangedListener> = Rc::new(ChangeListener { target: Rc::downgrade(state), view });
        let id = collection.subscribe(Rc::downgrade(&listener));
        tracing::debug!(view, listener = id.0, "subscribed to item changes");
        Self { collection, id: Some(id), _listener: listener }
    }

    pub(crate) fn detach(&mut self) {
        if let Some(id) = self.id.take() {
            self.collection.unsubscribe(id);
            tracing::debug!(listener = id.0, "unsubscribed from item changes");
        }
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Log and forward a fatal error to the host diagnostics before returning it.
pub(crate) fn report(ui: &UiContext, error: ChartError) -> ChartError {
    tracing::error!(%error, "chart view error");
    ui.diagnostics.report(&error);
    error
}

/// A click on the chart area as seen by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClickEvent {
    /// Pointer in plot (data) coordinates.
    pub plot_x: f64,
    pub plot_y: f64,
    /// Pointer in page coordinates, where a popup should open.
    pub page_x: f64,
    pub page_y: f64,
    pub inside_plot: bool,
    pub inside_popup: bool,
}

impl ClickEvent {
    pub fn in_plot(plot_x: f64, plot_y: f64, page_x: f64, page_y: f64) -> Self {
        Self { plot_x, plot_y, page_x, page_y, inside_plot: true, inside_popup: false }
    }

    pub fn outside() -> Self {
        Self::default()
    }
}
