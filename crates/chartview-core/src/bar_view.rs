// File: crates/chartview-core/src/bar_view.rs
// Summary: Bar / stacked-bar / line chart view: reconstruct pass, draw, legend, click-to-popup.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::accessor::ResolvedAccessors;
use crate::color::{legend_entries, ColorClassifier, DefaultColorCoder, LegendStyle};
use crate::config::{BarChartConfig, BarChartSettings};
use crate::error::{ChartError, Result};
use crate::hit::{Hit, HitTester};
use crate::host::{ChartRenderer, ColorCoder, Presenter, UiContext};
use crate::render::{BarPlot, DrawRequest};
use crate::series::{BarBuildOptions, PreparedBars, SeriesBuilder};
use crate::view::{report, Attachment, ClickEvent, Reconstruct};

const VIEW_NAME: &str = "barChart";

/// Last published state, frozen until the next reconstruct.
struct BarFrame {
    prepared: PreparedBars,
    plot: BarPlot,
}

struct BarViewState {
    settings: BarChartSettings,
    accessors: ResolvedAccessors,
    colors: ColorClassifier,
    ui: UiContext,
    renderer: Box<dyn ChartRenderer>,
    presenter: Box<dyn Presenter>,
    frame: Option<BarFrame>,
    popup_open: bool,
}

impl Reconstruct for BarViewState {
    fn reconstruct(&mut self) {
        self.renderer.clear();
        self.presenter.clear_legend();
        self.frame = None;

        let collection = Rc::clone(&self.ui.collection);
        let current_size = collection.count_restricted_items();
        tracing::debug!(view = VIEW_NAME, current_size, "reconstruct");

        let mut unplottable = Vec::new();
        if current_size > 0 {
            let builder = SeriesBuilder::new(
                BarBuildOptions::from_settings(&self.settings),
                &self.accessors,
                self.ui.database.as_ref(),
                &self.colors,
            );
            let prepared = builder.build(collection.restricted_items());
            let plot = BarPlot::from_prepared(&prepared, &self.settings, current_size);

            if let Err(e) = self.renderer.draw(&DrawRequest::Bar(&plot)) {
                report(&self.ui, ChartError::Render(format!("{e:#}")));
            }
            if let Some(coder) = self.colors.coder() {
                let entries = legend_entries(coder.as_ref(), &prepared.flags);
                if !entries.is_empty() {
                    let style = if coder.is_gradient() { LegendStyle::Gradient } else { LegendStyle::Swatches };
                    self.presenter.show_legend(&entries, style);
                }
            }
            unplottable = prepared.unplottable.clone();
            self.frame = Some(BarFrame { prepared, plot });
        }
        self.presenter.set_unplottable_message(current_size, &unplottable);
    }
}

impl BarViewState {
    fn tester(&self, frame: &BarFrame) -> HitTester {
        HitTester::new(self.settings.vertical_chart, self.settings.line_chart, frame.prepared.range.max)
    }

    fn hit(&self, x: f64, y: f64) -> Option<(Hit, usize)> {
        let frame = self.frame.as_ref()?;
        let hit = self.tester(frame).closest(frame.plot.series_data(), x, y)?;
        let rank = hit.rank(self.settings.vertical_chart, self.settings.line_chart);
        let index = frame.prepared.index_for_rank(rank)?;
        Some((hit, index))
    }
}

/// Bar chart view bound to a host collection.
pub struct BarChartView {
    state: Rc<RefCell<BarViewState>>,
    attachment: Attachment,
}

impl BarChartView {
    /// Build the view from a configuration bag, subscribe to item changes and run the
    /// first reconstruct. Configuration errors are reported to the host diagnostics.
    pub fn create(
        config: BarChartConfig,
        ui: UiContext,
        renderer: Box<dyn ChartRenderer>,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self> {
        let accessors = ResolvedAccessors::resolve(&config.bindings).map_err(|e| report(&ui, e))?;
        let colors = ColorClassifier::new(
            resolve_color_coder(&ui, &config.settings, accessors.has_color_key()),
            config.settings.color.clone(),
        );

        let state = Rc::new(RefCell::new(BarViewState {
            settings: config.settings,
            accessors,
            colors,
            ui: ui.clone(),
            renderer,
            presenter,
            frame: None,
            popup_open: false,
        }));
        let attachment = Attachment::attach(Rc::clone(&ui.collection), &state, VIEW_NAME);
        let view = Self { state, attachment };
        view.reconstruct();
        Ok(view)
    }

    /// Build the view from the attributes of a declarative markup node.
    pub fn create_from_markup(
        attrs: &HashMap<String, String>,
        ui: UiContext,
        renderer: Box<dyn ChartRenderer>,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self> {
        let config = BarChartConfig::from_markup_attributes(attrs).map_err(|e| report(&ui, e))?;
        Self::create(config, ui, renderer, presenter)
    }

    pub fn reconstruct(&self) {
        self.state.borrow_mut().reconstruct();
    }

    /// Container size changed; rebuild like a data change.
    pub fn on_resize(&self) {
        self.reconstruct();
    }

    pub fn settings(&self) -> BarChartSettings {
        self.state.borrow().settings.clone()
    }

    /// Plot container height and optional width, in pixels.
    pub fn plot_size(&self) -> (u32, Option<u32>) {
        let s = self.state.borrow();
        (s.settings.plot_height, s.settings.plot_width)
    }

    /// Data published by the last reconstruct; `None` when the item set was empty.
    pub fn prepared(&self) -> Option<Ref<'_, PreparedBars>> {
        Ref::filter_map(self.state.borrow(), |s| s.frame.as_ref().map(|f| &f.prepared)).ok()
    }

    pub fn plot(&self) -> Option<Ref<'_, BarPlot>> {
        Ref::filter_map(self.state.borrow(), |s| s.frame.as_ref().map(|f| &f.plot)).ok()
    }

    /// Published index of the item under a plot-space pointer, if any.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.state.borrow().hit(x, y).map(|(_, index)| index)
    }

    /// Handle a click: close an open popup when clicking elsewhere, then open a popup for
    /// the item under the pointer. Returns the published index that was opened.
    pub fn handle_click(&self, event: ClickEvent) -> Option<usize> {
        let mut state = self.state.borrow_mut();
        if state.popup_open && !event.inside_popup {
            state.popup_open = false;
            state.presenter.close_popup();
        }
        if state.popup_open || !event.inside_plot {
            return None;
        }
        let (_, index) = state.hit(event.plot_x, event.plot_y)?;
        let items = state.frame.as_ref()?.prepared.published[index].items.clone();
        state.presenter.open_popup(event.page_x, event.page_y, &items);
        state.popup_open = true;
        Some(index)
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_attached()
    }

    /// Detach from item-change notifications and release the renderer's output.
    pub fn dispose(mut self) {
        self.attachment.detach();
        let mut state = self.state.borrow_mut();
        state.renderer.clear();
        state.frame = None;
    }
}

fn resolve_color_coder(ui: &UiContext, settings: &BarChartSettings, has_color_key: bool) -> Option<Rc<dyn ColorCoder>> {
    if !has_color_key {
        return None;
    }
    let registered = settings.color_coder.as_deref().and_then(|id| {
        let coder = ui.color_coder(id);
        if coder.is_none() {
            tracing::debug!(id, "color coder not registered; using default");
        }
        coder
    });
    Some(registered.unwrap_or_else(|| Rc::new(DefaultColorCoder::new())))
}
