//! Application state — single-owner, main-thread only.
//!
//! The filter form is a draft: edits change nothing until it is submitted,
//! at which point a fresh `FilterSpec` is built and evaluated synchronously.

use std::time::Instant;

use sahamlab_core::report::{indicator_stats, IndicatorStats};
use sahamlab_core::{
    Bounds, Column, FilterSpec, FilteredView, Indicator, IndicatorSet, Metric, MetricRanges,
    Preset, ResultStore, SortDirection,
};

/// Which tab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Backtest,
    Report,
    Help,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Backtest, Panel::Report, Panel::Help];

    pub fn index(self) -> usize {
        match self {
            Panel::Backtest => 0,
            Panel::Report => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Panel::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Backtest => "Backtest",
            Panel::Report => "Report",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::ALL[(self.index() + 1) % Panel::ALL.len()]
    }

    pub fn prev(self) -> Panel {
        Panel::ALL[(self.index() + Panel::ALL.len() - 1) % Panel::ALL.len()]
    }
}

/// Which half of the Backtest tab receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    Table,
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

/// One of the two handles of a range slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Low,
    High,
}

/// A row of the filter sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Indicator(Indicator),
    Preset,
    Slider(Metric),
    Apply,
}

/// Sidebar rows, top to bottom.
pub const FORM_ROWS: [FormRow; 15] = [
    FormRow::Indicator(Indicator::Cci),
    FormRow::Indicator(Indicator::Rsi),
    FormRow::Indicator(Indicator::Macd),
    FormRow::Indicator(Indicator::Sto),
    FormRow::Indicator(Indicator::SmaCross),
    FormRow::Preset,
    FormRow::Slider(Metric::TotalTrades),
    FormRow::Slider(Metric::MaxDrawdown),
    FormRow::Slider(Metric::WinRate),
    FormRow::Slider(Metric::Return),
    FormRow::Slider(Metric::Sharpe),
    FormRow::Slider(Metric::ProfitFactor),
    FormRow::Slider(Metric::ReturnAnn),
    FormRow::Slider(Metric::AvgTrade),
    FormRow::Apply,
];

/// Draft state of the filter sidebar.
#[derive(Debug, Clone)]
pub struct FilterForm {
    pub indicators: IndicatorSet,
    pub preset: Preset,
    pub ranges: MetricRanges,
    pub cursor: usize,
    pub handle: Handle,
}

impl FilterForm {
    pub fn new(preset: Preset) -> Self {
        Self {
            indicators: IndicatorSet::all(),
            preset,
            ranges: preset.ranges(),
            cursor: 0,
            handle: Handle::Low,
        }
    }

    pub fn current_row(&self) -> FormRow {
        FORM_ROWS[self.cursor.min(FORM_ROWS.len() - 1)]
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let last = FORM_ROWS.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Choosing a preset overwrites all eight sliders.
    pub fn select_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.ranges = preset.ranges();
    }

    pub fn toggle_indicator(&mut self, indicator: Indicator) -> bool {
        self.indicators.toggle(indicator)
    }

    /// Move the active handle of `metric` by `ticks` steps.
    ///
    /// Values stay on the step grid inside the slider range, and the low
    /// handle never passes the high one.
    pub fn nudge(&mut self, metric: Metric, ticks: i32) {
        let control = metric.control();
        let Bounds { low, high } = self.ranges.get(metric);
        let bounds = match self.handle {
            Handle::Low => Bounds::new(control.nudge(low, ticks).min(high), high),
            Handle::High => Bounds::new(low, control.nudge(high, ticks).max(low)),
        };
        self.ranges.set(metric, bounds);
    }

    /// Drag the active handle all the way to its end of the slider.
    pub fn jump_to_end(&mut self, metric: Metric) {
        let control = metric.control();
        let Bounds { low, high } = self.ranges.get(metric);
        let bounds = match self.handle {
            Handle::Low => Bounds::new(control.min, high),
            Handle::High => Bounds::new(low, control.max),
        };
        self.ranges.set(metric, bounds);
    }

    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::new(self.ranges, self.indicators)
    }
}

/// Results table: the current view plus sorting and scrolling.
#[derive(Debug, Clone)]
pub struct ResultsTable {
    /// Filtered rows in store order.
    base: FilteredView,
    /// `base`, sorted if a sort is active.
    pub view: FilteredView,
    pub sort: Option<(Column, SortDirection)>,
    pub cursor: usize,
    pub scroll_offset: usize,
}

impl ResultsTable {
    pub fn new(view: FilteredView) -> Self {
        Self {
            base: view.clone(),
            view,
            sort: None,
            cursor: 0,
            scroll_offset: 0,
        }
    }

    /// Swap in a new result, keeping the active sort.
    pub fn replace(&mut self, view: FilteredView) {
        self.base = view;
        self.cursor = 0;
        self.scroll_offset = 0;
        self.resort();
    }

    fn resort(&mut self) {
        self.view = match self.sort {
            Some((column, direction)) => self.base.sorted_by(column, direction),
            None => self.base.clone(),
        };
    }

    pub fn cycle_sort(&mut self, forward: bool) {
        let column = match self.sort {
            Some((c, _)) if forward => c.next(),
            Some((c, _)) => c.prev(),
            None => Column::Sharpe,
        };
        let direction = self.sort.map(|(_, d)| d).unwrap_or(SortDirection::Descending);
        self.sort = Some((column, direction));
        self.resort();
    }

    pub fn flip_direction(&mut self) {
        if let Some((column, direction)) = self.sort {
            self.sort = Some((column, direction.flipped()));
            self.resort();
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.resort();
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.view.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.view.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.view.len().saturating_sub(1);
    }

    /// Scroll so the cursor row lies in a window of `height` rows.
    pub fn scroll_into_view(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    /// Position in the current view.
    Detail(usize),
}

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub focus: Focus,
    pub running: bool,

    pub store: ResultStore,
    pub form: FilterForm,
    pub table: ResultsTable,
    /// The spec behind the table, once something has been submitted.
    pub applied: Option<FilterSpec>,
    pub stats: Vec<IndicatorStats>,
    pub report_scroll: u16,

    pub status_message: Option<(String, StatusLevel)>,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(store: ResultStore, preset: Preset, show_welcome: bool) -> Self {
        let table = ResultsTable::new(store.all());
        let stats = indicator_stats(&store);
        let status = table.view.count_line();
        Self {
            active_panel: Panel::Backtest,
            focus: Focus::Form,
            running: true,
            store,
            form: FilterForm::new(preset),
            table,
            applied: None,
            stats,
            report_scroll: 0,
            status_message: Some((status, StatusLevel::Info)),
            overlay: if show_welcome {
                Overlay::Welcome
            } else {
                Overlay::None
            },
        }
    }

    /// Build a spec from the form and run it against the store.
    pub fn submit(&mut self) {
        let spec = self.form.to_spec();
        let started = Instant::now();
        let view = spec.apply(&self.store);
        tracing::info!(
            preset = %self.form.preset,
            indicators = %spec.indicators,
            matched = view.len(),
            total = view.total(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "filters applied"
        );

        let line = view.count_line();
        self.table.replace(view);
        self.applied = Some(spec);
        if spec.is_unsatisfiable() {
            self.set_warning(format!("{line} A low bound is above its high bound."));
        } else {
            self.set_status(line);
        }
    }

    /// True when the form differs from what the table shows.
    pub fn form_is_dirty(&self) -> bool {
        match &self.applied {
            Some(spec) => *spec != self.form.to_spec(),
            None => self.form.to_spec() != FilterSpec::default(),
        }
    }

    pub fn open_detail(&mut self) {
        if !self.table.view.is_empty() {
            self.overlay = Overlay::Detail(self.table.cursor);
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
