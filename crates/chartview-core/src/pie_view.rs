// File: crates/chartview-core/src/pie_view.rs
// Summary: Pie chart view: reconstruct pass with optional small-slice grouping, draw, summary.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::accessor::ResolvedAccessors;
use crate::config::{PieChartConfig, PieChartSettings};
use crate::error::{ChartError, Result};
use crate::host::{ChartRenderer, Presenter, UiContext};
use crate::pie::{Grouping, PieAggregate, PieAggregator};
use crate::render::{DrawRequest, PiePlot};
use crate::view::{report, Attachment, Reconstruct};

const VIEW_NAME: &str = "pieChart";

struct PieViewState {
    settings: PieChartSettings,
    accessors: ResolvedAccessors,
    ui: UiContext,
    renderer: Box<dyn ChartRenderer>,
    presenter: Box<dyn Presenter>,
    aggregate: Option<PieAggregate>,
}

impl Reconstruct for PieViewState {
    fn reconstruct(&mut self) {
        self.renderer.clear();
        self.presenter.clear_legend();
        self.aggregate = None;

        let collection = Rc::clone(&self.ui.collection);
        let current_size = collection.count_restricted_items();
        tracing::debug!(view = VIEW_NAME, current_size, "reconstruct");

        let mut unplottable = Vec::new();
        if current_size > 0 {
            let items = collection.restricted_items();
            let aggregator = PieAggregator::new(
                &self.accessors,
                self.ui.database.as_ref(),
                Grouping::from_settings(&self.settings),
            );
            let aggregate = aggregator.aggregate(&items);
            let plot = PiePlot::from_aggregate(&aggregate, &self.settings);
            if let Err(e) = self.renderer.draw(&DrawRequest::Pie(&plot)) {
                report(&self.ui, ChartError::Render(format!("{e:#}")));
            }
            unplottable = aggregate.unplottable.clone();
            self.aggregate = Some(aggregate);
        }
        self.presenter.set_unplottable_message(current_size, &unplottable);
    }
}

/// Pie chart view bound to a host collection.
pub struct PieChartView {
    state: Rc<RefCell<PieViewState>>,
    attachment: Attachment,
}

impl PieChartView {
    pub fn create(
        config: PieChartConfig,
        ui: UiContext,
        renderer: Box<dyn ChartRenderer>,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self> {
        let accessors = ResolvedAccessors::resolve(&config.bindings).map_err(|e| report(&ui, e))?;
        if !(0.0..=1.0).contains(&config.settings.cutoff) {
            return Err(report(
                &ui,
                ChartError::InvalidSetting {
                    name: "cutoff".into(),
                    reason: format!("{} is not a fraction in [0, 1]", config.settings.cutoff),
                },
            ));
        }

        let state = Rc::new(RefCell::new(PieViewState {
            settings: config.settings,
            accessors,
            ui: ui.clone(),
            renderer,
            presenter,
            aggregate: None,
        }));
        let attachment = Attachment::attach(Rc::clone(&ui.collection), &state, VIEW_NAME);
        let view = Self { state, attachment };
        view.reconstruct();
        Ok(view)
    }

    pub fn create_from_markup(
        attrs: &HashMap<String, String>,
        ui: UiContext,
        renderer: Box<dyn ChartRenderer>,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self> {
        let config = PieChartConfig::from_markup_attributes(attrs).map_err(|e| report(&ui, e))?;
        Self::create(config, ui, renderer, presenter)
    }

    pub fn reconstruct(&self) {
        self.state.borrow_mut().reconstruct();
    }

    pub fn on_resize(&self) {
        self.reconstruct();
    }

    pub fn plot_size(&self) -> (u32, Option<u32>) {
        let s = self.state.borrow();
        (s.settings.plot_height, s.settings.plot_width)
    }

    pub fn aggregate(&self) -> Option<Ref<'_, PieAggregate>> {
        Ref::filter_map(self.state.borrow(), |s| s.aggregate.as_ref()).ok()
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_attached()
    }

    pub fn dispose(mut self) {
        self.attachment.detach();
        let mut state = self.state.borrow_mut();
        state.renderer.clear();
        state.aggregate = None;
    }
}
