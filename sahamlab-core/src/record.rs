//! One row of the result dataset, and the table columns used to display it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseError;
use crate::indicator::{Indicator, IndicatorSet};
use crate::metric::Metric;

/// Summary statistics of a single backtest run.
///
/// Field names follow the dataset's column headers. The optional fields are
/// displayed but never filtered on, so a dataset may omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRecord {
    #[serde(rename = "Indicator Settings")]
    pub settings: String,

    #[serde(
        rename = "Equity Final",
        alias = "Equity Final [Rp]",
        alias = "Equity Final [$]",
        default
    )]
    pub equity_final: Option<f64>,

    #[serde(rename = "Return [%]", deserialize_with = "nan_if_empty")]
    pub return_pct: f64,

    #[serde(
        rename = "Return Ann [%]",
        alias = "Return (Ann.) [%]",
        deserialize_with = "nan_if_empty"
    )]
    pub return_ann_pct: f64,

    #[serde(rename = "Sharpe Ratio", deserialize_with = "nan_if_empty")]
    pub sharpe: f64,

    #[serde(rename = "Sortino Ratio", default)]
    pub sortino: Option<f64>,

    #[serde(rename = "Calmar Ratio", default)]
    pub calmar: Option<f64>,

    #[serde(
        rename = "Max Drawdown [%]",
        alias = "Max. Drawdown [%]",
        deserialize_with = "nan_if_empty"
    )]
    pub max_drawdown_pct: f64,

    #[serde(
        rename = "Max Drawdown Duration",
        alias = "Max. Drawdown Duration",
        default
    )]
    pub max_drawdown_duration: Option<String>,

    #[serde(rename = "Total Trades", alias = "# Trades", deserialize_with = "nan_if_empty")]
    pub total_trades: f64,

    #[serde(rename = "Win Rate [%]", deserialize_with = "nan_if_empty")]
    pub win_rate_pct: f64,

    #[serde(rename = "Profit Factor", deserialize_with = "nan_if_empty")]
    pub profit_factor: f64,

    #[serde(
        rename = "Avg Trade [%]",
        alias = "Avg. Trade [%]",
        deserialize_with = "nan_if_empty"
    )]
    pub avg_trade_pct: f64,

    #[serde(rename = "Best Trade [%]", default)]
    pub best_trade_pct: Option<f64>,

    #[serde(rename = "Worst Trade [%]", default)]
    pub worst_trade_pct: Option<f64>,

    /// Primary indicator, used for grouping. Read from the optional
    /// `Indicator` column; filled from the settings text when the column is
    /// absent or holds a name outside the vocabulary.
    #[serde(rename = "Indicator", default, deserialize_with = "csv::invalid_option")]
    pub indicator: Option<Indicator>,

    #[serde(skip)]
    tags: IndicatorSet,
}

/// Columns the dataset must carry, with the aliases accepted for each.
pub(crate) const REQUIRED_COLUMNS: [(&str, &[&str]); 9] = [
    ("Indicator Settings", &[]),
    ("Return [%]", &[]),
    ("Return Ann [%]", &["Return (Ann.) [%]"]),
    ("Sharpe Ratio", &[]),
    ("Max Drawdown [%]", &["Max. Drawdown [%]"]),
    ("Total Trades", &["# Trades"]),
    ("Win Rate [%]", &[]),
    ("Profit Factor", &[]),
    ("Avg Trade [%]", &["Avg. Trade [%]"]),
];

impl BacktestRecord {
    /// A record with the given settings text and every metric at zero.
    pub fn new(settings: impl Into<String>) -> Self {
        Self {
            settings: settings.into(),
            equity_final: None,
            return_pct: 0.0,
            return_ann_pct: 0.0,
            sharpe: 0.0,
            sortino: None,
            calmar: None,
            max_drawdown_pct: 0.0,
            max_drawdown_duration: None,
            total_trades: 0.0,
            win_rate_pct: 0.0,
            profit_factor: 0.0,
            avg_trade_pct: 0.0,
            best_trade_pct: None,
            worst_trade_pct: None,
            indicator: None,
            tags: IndicatorSet::empty(),
        }
    }

    /// Set one of the eight filterable metrics.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        match metric {
            Metric::TotalTrades => self.total_trades = value,
            Metric::MaxDrawdown => self.max_drawdown_pct = value,
            Metric::WinRate => self.win_rate_pct = value,
            Metric::Return => self.return_pct = value,
            Metric::Sharpe => self.sharpe = value,
            Metric::ProfitFactor => self.profit_factor = value,
            Metric::ReturnAnn => self.return_ann_pct = value,
            Metric::AvgTrade => self.avg_trade_pct = value,
        }
        self
    }

    /// Derive indicator tags from the settings text.
    ///
    /// Only the settings text decides which indicators a record matches.
    /// The `Indicator` column sets the primary indicator and nothing else.
    /// The store calls this on every record it ingests.
    pub fn tagged(mut self) -> Self {
        if self.indicator.is_none() {
            self.indicator = Indicator::detect(&self.settings);
        }
        self.tags = IndicatorSet::tags_in(&self.settings);
        self
    }

    /// Indicators this record belongs to.
    pub fn tags(&self) -> IndicatorSet {
        self.tags
    }

    /// `Max Drawdown Duration` as a time span.
    ///
    /// Accepts `"123 days 04:05:06"`, `"123 days"` and a bare day count.
    pub fn max_drawdown_duration_span(&self) -> Option<chrono::Duration> {
        self.max_drawdown_duration
            .as_deref()
            .and_then(parse_duration)
    }
}

/// An empty cell in a filterable column reads as NaN, which no range
/// matches.
fn nan_if_empty<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn parse_duration(text: &str) -> Option<chrono::Duration> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(days) = text.parse::<f64>() {
        if !days.is_finite() {
            return None;
        }
        return chrono::Duration::try_seconds((days * 86_400.0).round() as i64);
    }

    let (days_part, clock_part) = match text.split_once("days") {
        Some((d, rest)) => (d.trim(), rest.trim()),
        None => match text.split_once("day") {
            Some((d, rest)) => (d.trim(), rest.trim()),
            None => ("0", text),
        },
    };
    let days: i64 = days_part.parse().ok()?;
    let mut seconds = days.checked_mul(86_400)?;

    if !clock_part.is_empty() {
        let mut fields = clock_part.split(':');
        let h: i64 = fields.next()?.parse().ok()?;
        let m: i64 = fields.next()?.parse().ok()?;
        let s: f64 = fields.next().unwrap_or("0").parse().ok()?;
        seconds = seconds
            .checked_add(h * 3_600)?
            .checked_add(m * 60)?
            .checked_add(s.trunc() as i64)?;
    }
    chrono::Duration::try_seconds(seconds)
}

/// A column of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Settings,
    Indicator,
    EquityFinal,
    Return,
    ReturnAnn,
    Sharpe,
    Sortino,
    Calmar,
    MaxDrawdown,
    MaxDrawdownDuration,
    TotalTrades,
    WinRate,
    ProfitFactor,
    AvgTrade,
    BestTrade,
    WorstTrade,
}

/// Sort direction for a table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl Column {
    /// Display order of the table.
    pub const ALL: [Column; 16] = [
        Column::Settings,
        Column::Indicator,
        Column::EquityFinal,
        Column::Return,
        Column::ReturnAnn,
        Column::Sharpe,
        Column::Sortino,
        Column::Calmar,
        Column::MaxDrawdown,
        Column::MaxDrawdownDuration,
        Column::TotalTrades,
        Column::WinRate,
        Column::ProfitFactor,
        Column::AvgTrade,
        Column::BestTrade,
        Column::WorstTrade,
    ];

    /// Header as written in the dataset.
    pub fn header(self) -> &'static str {
        match self {
            Column::Settings => "Indicator Settings",
            Column::Indicator => "Indicator",
            Column::EquityFinal => "Equity Final",
            Column::Return => "Return [%]",
            Column::ReturnAnn => "Return Ann [%]",
            Column::Sharpe => "Sharpe Ratio",
            Column::Sortino => "Sortino Ratio",
            Column::Calmar => "Calmar Ratio",
            Column::MaxDrawdown => "Max Drawdown [%]",
            Column::MaxDrawdownDuration => "Max Drawdown Duration",
            Column::TotalTrades => "Total Trades",
            Column::WinRate => "Win Rate [%]",
            Column::ProfitFactor => "Profit Factor",
            Column::AvgTrade => "Avg Trade [%]",
            Column::BestTrade => "Best Trade [%]",
            Column::WorstTrade => "Worst Trade [%]",
        }
    }

    /// Compact header for narrow terminals.
    pub fn short_header(self) -> &'static str {
        match self {
            Column::Settings => "Settings",
            Column::Indicator => "Ind",
            Column::EquityFinal => "Equity",
            Column::Return => "Ret%",
            Column::ReturnAnn => "Ann%",
            Column::Sharpe => "Sharpe",
            Column::Sortino => "Sortino",
            Column::Calmar => "Calmar",
            Column::MaxDrawdown => "MaxDD%",
            Column::MaxDrawdownDuration => "DD Dur",
            Column::TotalTrades => "Trades",
            Column::WinRate => "WR%",
            Column::ProfitFactor => "PF",
            Column::AvgTrade => "Avg%",
            Column::BestTrade => "Best%",
            Column::WorstTrade => "Worst%",
        }
    }

    /// Command-line key, e.g. `sharpe` or `win-rate`.
    pub fn key(self) -> &'static str {
        match self {
            Column::Settings => "settings",
            Column::Indicator => "indicator",
            Column::EquityFinal => "equity",
            Column::Return => "return",
            Column::ReturnAnn => "return-ann",
            Column::Sharpe => "sharpe",
            Column::Sortino => "sortino",
            Column::Calmar => "calmar",
            Column::MaxDrawdown => "drawdown",
            Column::MaxDrawdownDuration => "drawdown-duration",
            Column::TotalTrades => "trades",
            Column::WinRate => "win-rate",
            Column::ProfitFactor => "profit-factor",
            Column::AvgTrade => "avg-trade",
            Column::BestTrade => "best-trade",
            Column::WorstTrade => "worst-trade",
        }
    }

    /// The filterable metric shown in this column, if any.
    pub fn metric(self) -> Option<Metric> {
        match self {
            Column::Return => Some(Metric::Return),
            Column::ReturnAnn => Some(Metric::ReturnAnn),
            Column::Sharpe => Some(Metric::Sharpe),
            Column::MaxDrawdown => Some(Metric::MaxDrawdown),
            Column::TotalTrades => Some(Metric::TotalTrades),
            Column::WinRate => Some(Metric::WinRate),
            Column::ProfitFactor => Some(Metric::ProfitFactor),
            Column::AvgTrade => Some(Metric::AvgTrade),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Settings | Column::Indicator)
    }

    /// Formatted cell text.
    pub fn cell(self, record: &BacktestRecord) -> String {
        match self {
            Column::Settings => record.settings.clone(),
            Column::Indicator => record
                .indicator
                .map(|i| i.token().to_string())
                .unwrap_or_else(|| "-".into()),
            Column::MaxDrawdownDuration => record
                .max_drawdown_duration
                .clone()
                .unwrap_or_else(|| "-".into()),
            Column::TotalTrades => format!("{:.0}", record.total_trades),
            Column::EquityFinal => fmt_opt(record.equity_final, 0),
            Column::Sortino => fmt_opt(record.sortino, 2),
            Column::Calmar => fmt_opt(record.calmar, 2),
            Column::BestTrade => fmt_opt(record.best_trade_pct, 2),
            Column::WorstTrade => fmt_opt(record.worst_trade_pct, 2),
            Column::Return => format!("{:.2}", record.return_pct),
            Column::ReturnAnn => format!("{:.2}", record.return_ann_pct),
            Column::Sharpe => format!("{:.2}", record.sharpe),
            Column::MaxDrawdown => format!("{:.2}", record.max_drawdown_pct),
            Column::WinRate => format!("{:.2}", record.win_rate_pct),
            Column::ProfitFactor => format!("{:.2}", record.profit_factor),
            Column::AvgTrade => format!("{:.2}", record.avg_trade_pct),
        }
    }

    fn sort_value(self, record: &BacktestRecord) -> SortValue<'_> {
        let num = |v: Option<f64>| match v {
            Some(x) if !x.is_nan() => SortValue::Number(x),
            _ => SortValue::Missing,
        };
        match self {
            Column::Settings => SortValue::Text(&record.settings),
            Column::Indicator => match record.indicator {
                Some(ind) => SortValue::Text(ind.token()),
                None => SortValue::Missing,
            },
            Column::MaxDrawdownDuration => num(record
                .max_drawdown_duration_span()
                .map(|d| d.num_seconds() as f64)),
            Column::EquityFinal => num(record.equity_final),
            Column::Sortino => num(record.sortino),
            Column::Calmar => num(record.calmar),
            Column::BestTrade => num(record.best_trade_pct),
            Column::WorstTrade => num(record.worst_trade_pct),
            _ => match self.metric() {
                Some(metric) => num(Some(metric.value(record))),
                None => SortValue::Missing,
            },
        }
    }

    /// Compare two records on this column. Missing values sort last in
    /// either direction.
    pub fn compare(
        self,
        a: &BacktestRecord,
        b: &BacktestRecord,
        direction: SortDirection,
    ) -> Ordering {
        let ord = match (self.sort_value(a), self.sort_value(b)) {
            (SortValue::Missing, SortValue::Missing) => return Ordering::Equal,
            (SortValue::Missing, _) => return Ordering::Greater,
            (_, SortValue::Missing) => return Ordering::Less,
            (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(&y),
            (SortValue::Text(x), SortValue::Text(y)) => x.cmp(y),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    pub fn next(self) -> Column {
        let i = Column::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Column::ALL[(i + 1) % Column::ALL.len()]
    }

    pub fn prev(self) -> Column {
        let i = Column::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Column::ALL[(i + Column::ALL.len() - 1) % Column::ALL.len()]
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".into(),
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Column::ALL
            .into_iter()
            .find(|c| {
                c.key().eq_ignore_ascii_case(wanted)
                    || c.header().eq_ignore_ascii_case(wanted)
                    || c.short_header().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ParseError::UnknownColumn(s.to_string()))
    }
}
