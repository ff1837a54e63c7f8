//! SahamLab Core — backtest result store, filter queries, presets and report data.
//!
//! This crate holds everything the dashboard and CLI share:
//! - The result dataset (`ResultStore`) loaded from CSV, with each record
//!   tagged by indicator at load time
//! - Typed filter specifications: eight inclusive metric ranges plus an
//!   indicator set, evaluated directly over records
//! - Named presets and the slider controls they sit on
//! - Sortable filtered views
//! - Report content and per-indicator statistics
//! - Dataset preparation (top N per indicator by Sharpe)
//! - Config file and tracing setup

pub mod config;
pub mod error;
pub mod filter;
pub mod indicator;
pub mod logging;
pub mod metric;
pub mod prepare;
pub mod preset;
pub mod record;
pub mod report;
pub mod store;
pub mod view;

pub use config::DashboardConfig;
pub use error::{ConfigError, LoggingError, ParseError, StoreError};
pub use filter::{Bounds, FilterSpec, MetricRanges};
pub use indicator::{Indicator, IndicatorSet};
pub use metric::{Metric, SliderControl};
pub use preset::Preset;
pub use record::{BacktestRecord, Column, SortDirection};
pub use store::ResultStore;
pub use view::FilteredView;
