use std::time::Instant;

use throbber_widgets_tui::ThrobberState;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::api::{DataFetcher, HttpFetcher};
use crate::app::actions::{DashboardActions, StartupOutcome};
use crate::dashboard::{PassSummary, SlotId};
use crate::domain::{Dimension, FilterControls, FilterState, SelectControl};

/// Chart pages, selected with the number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTab {
    Global,
    Country,
    Summary,
    Compare,
}

impl ChartTab {
    pub const ALL: [Self; 4] = [Self::Global, Self::Country, Self::Summary, Self::Compare];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Global),
            1 => Some(Self::Country),
            2 => Some(Self::Summary),
            3 => Some(Self::Compare),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Country => "Country",
            Self::Summary => "Summary",
            Self::Compare => "Compare",
        }
    }

    /// Slots shown on the page, in layout order.
    pub const fn slots(self) -> &'static [SlotId] {
        match self {
            Self::Global => &[
                SlotId::Map,
                SlotId::BubbleMap,
                SlotId::TopProducers,
                SlotId::Bubble,
            ],
            Self::Country => &[SlotId::Trend, SlotId::Bar, SlotId::Scatter],
            Self::Summary => &[SlotId::Decade, SlotId::Yearly, SlotId::Stats],
            Self::Compare => &[SlotId::Radar, SlotId::Values],
        }
    }
}

pub struct App<F = HttpFetcher> {
    pub running: bool,
    pub controls: FilterControls,
    pub focus: Dimension,
    pub chart_tab_index: usize,
    pub status_message: String,
    pub show_help: bool,
    /// Fuzzy search query for the focused control, while searching.
    pub search: Option<String>,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub throbber_state: ThrobberState,
    pub last_pass: Option<PassSummary>,
    pub initialized: bool,
    pub actions: DashboardActions<F>,
    /// Filters from the command line, applied once the options arrive.
    pub initial_filters: FilterState,
    startup: Option<oneshot::Receiver<StartupOutcome>>,
}

impl<F> App<F> {
    pub fn is_busy(&self) -> bool {
        self.startup.is_some() || self.actions.in_flight() > 0
    }

    pub const fn focused_control(&self) -> &SelectControl {
        self.controls.control(self.focus)
    }

    pub fn chart_tab(&self) -> ChartTab {
        ChartTab::from_index(self.chart_tab_index).unwrap_or(ChartTab::Global)
    }

    pub fn filter_state(&self) -> FilterState {
        self.controls.filter_state()
    }
}

impl<F: DataFetcher> App<F> {
    pub fn new(actions: DashboardActions<F>, initial_filters: FilterState) -> Self {
        Self {
            running: true,
            controls: FilterControls::default(),
            focus: Dimension::Country,
            chart_tab_index: 0,
            status_message: "Loading options...".to_string(),
            show_help: false,
            search: None,
            animation_counter: 0.0,
            last_frame: Instant::now(),
            throbber_state: ThrobberState::default(),
            last_pass: None,
            initialized: false,
            actions,
            initial_filters,
            startup: None,
        }
    }

    /// Kicks off dropdown population, the fixed charts and the first pass.
    pub fn start(&mut self) {
        self.startup = Some(self.actions.spawn_startup());
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Update animation counter (cycles between 0 and 2*PI)
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.is_busy() {
            self.throbber_state.calc_next();
        }

        self.poll_startup();
    }

    fn poll_startup(&mut self) {
        let Some(receiver) = self.startup.as_mut() else {
            return;
        };

        match receiver.try_recv() {
            Ok(outcome) => {
                self.startup = None;
                self.finish_startup(outcome);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                self.startup = None;
                self.initialized = true;
                self.status_message = "Dashboard initialization failed".to_string();
                tracing::error!("startup task ended without a result");
            }
        }
    }

    pub fn finish_startup(&mut self, outcome: StartupOutcome) {
        outcome.lists.apply(&mut self.controls);
        self.last_pass = Some(outcome.first_pass);
        self.initialized = true;
        self.status_message = format!(
            "Loaded {} countries, {} years, {} products",
            outcome.lists.countries.len(),
            outcome.lists.years.len(),
            outcome.lists.products.len()
        );

        let initial = std::mem::take(&mut self.initial_filters);
        if initial != FilterState::default() {
            let mut matched = true;
            for dimension in Dimension::ALL {
                let value = initial.get(dimension);
                if !value.is_empty() && !self.controls.control_mut(dimension).select_value(value) {
                    tracing::warn!(dimension = dimension.as_str(), value, "unknown initial filter");
                    matched = false;
                }
            }
            self.apply_filters();
            if !matched {
                self.status_message = "Some command-line filters were not found".to_string();
            }
        }
    }

    /// Change event: snapshots the controls and starts an update pass.
    pub fn apply_filters(&mut self) {
        let filters = self.filter_state();
        let pass = self.actions.run_pass(filters);
        self.status_message = format!(
            "Updating {} chart{} (pass {})",
            pass.invoked.len(),
            if pass.invoked.len() == 1 { "" } else { "s" },
            pass.generation
        );
        self.last_pass = Some(pass.summary());
    }

    /// Moves the focused control to `index`, firing a change event when the
    /// selection actually changed.
    pub fn select_focused(&mut self, index: usize) {
        let control = self.controls.control_mut(self.focus);
        let before = control.selected;
        control.select(index);
        if control.selected != before {
            self.apply_filters();
        }
    }
}
