//! The eight filterable performance metrics and their slider controls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::record::BacktestRecord;

/// A filterable metric. `ALL` is the sidebar order of the range sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    TotalTrades,
    MaxDrawdown,
    WinRate,
    Return,
    Sharpe,
    ProfitFactor,
    ReturnAnn,
    AvgTrade,
}

/// Fixed range and resolution of a metric's range slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderControl {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Decimal places shown and kept after snapping.
    pub decimals: u32,
}

impl SliderControl {
    /// Clamp into `[min, max]` and round onto the step grid.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let ticks = ((clamped - self.min) / self.step).round();
        self.round(self.min + ticks * self.step).clamp(self.min, self.max)
    }

    /// Move `value` by `ticks` steps and snap.
    pub fn nudge(&self, value: f64, ticks: i32) -> f64 {
        self.snap(value + f64::from(ticks) * self.step)
    }

    /// Number of steps between `min` and `max`.
    pub fn tick_count(&self) -> u32 {
        ((self.max - self.min) / self.step).round() as u32
    }

    /// Position of `value` along the slider, in `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals as usize, value)
    }

    // Rounding through the decimal scale keeps 30 * 0.01 at exactly 0.3.
    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals as i32);
        (value * scale).round() / scale
    }
}

impl Metric {
    pub const COUNT: usize = 8;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::TotalTrades,
        Metric::MaxDrawdown,
        Metric::WinRate,
        Metric::Return,
        Metric::Sharpe,
        Metric::ProfitFactor,
        Metric::ReturnAnn,
        Metric::AvgTrade,
    ];

    pub fn index(self) -> usize {
        match self {
            Metric::TotalTrades => 0,
            Metric::MaxDrawdown => 1,
            Metric::WinRate => 2,
            Metric::Return => 3,
            Metric::Sharpe => 4,
            Metric::ProfitFactor => 5,
            Metric::ReturnAnn => 6,
            Metric::AvgTrade => 7,
        }
    }

    /// Dataset column the metric is read from.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::TotalTrades => "Total Trades",
            Metric::MaxDrawdown => "Max Drawdown [%]",
            Metric::WinRate => "Win Rate [%]",
            Metric::Return => "Return [%]",
            Metric::Sharpe => "Sharpe Ratio",
            Metric::ProfitFactor => "Profit Factor",
            Metric::ReturnAnn => "Return Ann [%]",
            Metric::AvgTrade => "Avg Trade [%]",
        }
    }

    /// Command-line flag name, without dashes.
    pub fn key(self) -> &'static str {
        match self {
            Metric::TotalTrades => "trades",
            Metric::MaxDrawdown => "drawdown",
            Metric::WinRate => "win-rate",
            Metric::Return => "return",
            Metric::Sharpe => "sharpe",
            Metric::ProfitFactor => "profit-factor",
            Metric::ReturnAnn => "return-ann",
            Metric::AvgTrade => "avg-trade",
        }
    }

    pub fn value(self, record: &BacktestRecord) -> f64 {
        match self {
            Metric::TotalTrades => record.total_trades,
            Metric::MaxDrawdown => record.max_drawdown_pct,
            Metric::WinRate => record.win_rate_pct,
            Metric::Return => record.return_pct,
            Metric::Sharpe => record.sharpe,
            Metric::ProfitFactor => record.profit_factor,
            Metric::ReturnAnn => record.return_ann_pct,
            Metric::AvgTrade => record.avg_trade_pct,
        }
    }

    pub fn control(self) -> SliderControl {
        let (min, max, step, decimals) = match self {
            Metric::TotalTrades => (0.0, 300.0, 10.0, 0),
            Metric::MaxDrawdown => (-70.0, 0.0, 1.0, 0),
            Metric::WinRate => (0.0, 90.0, 1.0, 0),
            Metric::Return => (0.0, 200.0, 1.0, 0),
            Metric::Sharpe => (0.0, 1.0, 0.01, 2),
            Metric::ProfitFactor => (0.0, 2000.0, 10.0, 0),
            Metric::ReturnAnn => (0.0, 10.0, 1.0, 0),
            Metric::AvgTrade => (0.0, 50.0, 1.0, 0),
        };
        SliderControl {
            min,
            max,
            step,
            decimals,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| {
                m.key().eq_ignore_ascii_case(wanted)
                    || m.key().replace('-', "_").eq_ignore_ascii_case(wanted)
                    || m.column_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ParseError::UnknownMetric(s.to_string()))
    }
}
