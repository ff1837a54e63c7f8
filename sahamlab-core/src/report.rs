//! Report content: study narrative, published highlight tables, and live
//! per-indicator statistics over the loaded store.

use chrono::NaiveDate;
use serde::Serialize;

use crate::indicator::Indicator;
use crate::record::BacktestRecord;
use crate::store::ResultStore;

/// Runs in the full study, before the per-indicator cut.
pub const STUDY_RUNS: usize = 447_562;
/// Stocks covered by the study.
pub const STUDY_TICKERS: [&str; 15] = [
    "ADRO", "AKRA", "ASII", "BBCA", "BBRI", "BBNI", "BMRI", "INCO", "INDF", "ITMG", "MAPI", "MEDC",
    "PTBA", "TLKM", "UNTR",
];
/// Initial capital per backtest, in rupiah.
pub const INITIAL_CAPITAL_IDR: u64 = 100_000_000;
/// Share of capital allocated per trade.
pub const ALLOCATION_PER_TRADE_PCT: f64 = 5.0;
/// Sharpe Ratio of the IDX Composite benchmark over the study period.
pub const BENCHMARK_SHARPE: f64 = 0.31;

pub fn study_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2012, 1, 1).unwrap_or_default()
}

pub fn study_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 12, 31).unwrap_or_default()
}

/// One titled block of report prose.
#[derive(Debug, Clone, Copy)]
pub struct ReportSection {
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
}

pub const SECTIONS: &[ReportSection] = &[
    ReportSection {
        title: "1. Why backtest?",
        paragraphs: &[
            "Most traders run indicators on their stock default settings, RSI 14 30 70 or MACD 12 26 9, without knowing whether those settings perform well. Backtesting each indicator against historical prices shows how it actually behaves.",
            "The goal is not to crown a single best indicator. It is to find the indicator and settings that fit your own trading style and risk tolerance.",
        ],
    },
    ReportSection {
        title: "2. Methodology",
        paragraphs: &[
            "Daily closing prices from January 2012 to December 2022, covering both bull and bear phases. Transaction costs are ignored. The IDX Composite index is the benchmark.",
            "Fifteen liquid stocks, mostly LQ45 members: ADRO, AKRA, ASII, BBCA, BBRI, BBNI, BMRI, INCO, INDF, ITMG, MAPI, MEDC, PTBA, TLKM, UNTR. At most one order per stock per day.",
            "Every run starts with Rp100,000,000 and allocates 5% of capital per trade. Trades that cannot be funded are skipped and open trades are closed at the end of the period. No position sizing, no stop loss.",
            "Five indicators were swept over their parameters: CCI, MACD, Double SMA crossover, RSI and the full Stochastic oscillator, for about 447,562 runs in total. Settings that never produced a signal were discarded.",
        ],
    },
    ReportSection {
        title: "3. Curve fitting",
        paragraphs: &[
            "No indicator is perfect. Runs that reached a 100% win rate are the product of curve fitting: parameters tuned to the past that would fail live. All of them were removed from the results.",
        ],
    },
    ReportSection {
        title: "4. Metrics",
        paragraphs: &[
            "Equity Final: capital at the end of the run. Return and Return Ann: total and annualized gain on initial capital. Sharpe, Sortino and Calmar Ratio: return against total volatility, downside volatility and maximum drawdown. Max Drawdown and its duration: the deepest peak-to-trough loss and how long recovery took. Total Trades, Win Rate, Profit Factor, Avg/Best/Worst Trade: trade-level statistics.",
            "Sharpe Ratio is the main yardstick. An indicator earns a look when it beats the IDX Composite Sharpe of 0.31 over the same period. The dataset is sorted by Sharpe Ratio, so the top rows combine high return with small drawdowns.",
        ],
    },
    ReportSection {
        title: "5. Choosing an indicator",
        paragraphs: &[
            "The Short Term preset suits daily to weekly trading; Long Term suits monthly to yearly holding. Total Trades is the quickest tell: long-term settings trade rarely, short-term settings trade often.",
            "Long-term settings: few trades, larger drawdowns, higher win rate and return. Short-term settings: many trades, smaller drawdowns, lower win rate and return. Higher return always comes with higher risk.",
        ],
    },
    ReportSection {
        title: "6. Conclusions",
        paragraphs: &[
            "Stochastics (155%), RSI (121%) and CCI (107%) clearly outperformed MACD (16%) and SMA crossover (6%). The SMA crossover works for reading trend direction but should be paired with RSI or Stochastics.",
            "Stochastics suits long-term use: fewest trades, highest return, win rate, profit factor and Sharpe, but also the deepest drawdown. Recommended settings from this dataset: Stochastics 32,8,6 (86,24) for long-term and RSI 5,39,91 for short-term trading.",
        ],
    },
    ReportSection {
        title: "7. Entering the settings in TradingView",
        paragraphs: &[
            "Apply the five indicators in TradingView exactly as they were backtested. Otherwise the chart will not reproduce the metrics in this dataset.",
            "MACD: settings that exceed TradingView's maximum input need the limit raised by editing the indicator's Pine Script.",
            "Stochastics: the backtest smooths %K and %D with an EMA, not an SMA. The built-in indicator cannot switch this, so edit its Pine Script to use an EMA.",
            "Every other input can be entered as usual in the indicator settings.",
        ],
    },
];

/// A published ranking of the five indicators on one metric.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HighlightTable {
    pub title: &'static str,
    pub metric: &'static str,
    pub rows: [(Indicator, &'static str); 5],
}

/// Rankings computed over the full study.
pub const HIGHLIGHTS: [HighlightTable; 6] = [
    HighlightTable {
        title: "Average Total Trades",
        metric: "Total Trades",
        rows: [
            (Indicator::Rsi, "266"),
            (Indicator::Cci, "211"),
            (Indicator::Sto, "165"),
            (Indicator::SmaCross, "101"),
            (Indicator::Macd, "48"),
        ],
    },
    HighlightTable {
        title: "Smallest Max Drawdown",
        metric: "Max Drawdown",
        rows: [
            (Indicator::Rsi, "-2.29"),
            (Indicator::SmaCross, "-2.86"),
            (Indicator::Cci, "-3.31"),
            (Indicator::Sto, "-5.03"),
            (Indicator::Macd, "-7.81"),
        ],
    },
    HighlightTable {
        title: "Highest Win Rate",
        metric: "Win Rate",
        rows: [
            (Indicator::Sto, "85%"),
            (Indicator::Macd, "78%"),
            (Indicator::Cci, "77%"),
            (Indicator::Rsi, "76%"),
            (Indicator::SmaCross, "59%"),
        ],
    },
    HighlightTable {
        title: "Highest Return",
        metric: "Return",
        rows: [
            (Indicator::Sto, "155%"),
            (Indicator::Rsi, "121%"),
            (Indicator::Cci, "107%"),
            (Indicator::Macd, "16%"),
            (Indicator::SmaCross, "6%"),
        ],
    },
    HighlightTable {
        title: "Highest Profit Factor",
        metric: "Profit Factor",
        rows: [
            (Indicator::Sto, "1813"),
            (Indicator::Rsi, "695"),
            (Indicator::Cci, "299"),
            (Indicator::Macd, "124"),
            (Indicator::SmaCross, "66"),
        ],
    },
    HighlightTable {
        title: "Highest Sharpe Ratio",
        metric: "Sharpe Ratio",
        rows: [
            (Indicator::Sto, "0.5"),
            (Indicator::Rsi, "0.37"),
            (Indicator::Macd, "0.36"),
            (Indicator::Cci, "0.34"),
            (Indicator::SmaCross, "0.33"),
        ],
    },
];

/// Aggregates for one indicator over the loaded rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorStats {
    pub indicator: Indicator,
    pub rows: usize,
    pub best_sharpe: f64,
    pub mean_return_pct: f64,
    pub mean_win_rate_pct: f64,
    pub mean_total_trades: f64,
    /// Deepest (most negative) drawdown.
    pub worst_drawdown_pct: f64,
}

/// Per-indicator aggregates, in checkbox order. Indicators with no rows are
/// omitted. NaN values are skipped.
pub fn indicator_stats(store: &ResultStore) -> Vec<IndicatorStats> {
    Indicator::ALL
        .into_iter()
        .filter_map(|ind| {
            let rows: Vec<&BacktestRecord> = store
                .records()
                .iter()
                .filter(|r| r.indicator == Some(ind))
                .collect();
            if rows.is_empty() {
                return None;
            }
            Some(IndicatorStats {
                indicator: ind,
                rows: rows.len(),
                best_sharpe: finite(&rows, |r| r.sharpe).fold(f64::NAN, f64::max),
                mean_return_pct: mean(finite(&rows, |r| r.return_pct)),
                mean_win_rate_pct: mean(finite(&rows, |r| r.win_rate_pct)),
                mean_total_trades: mean(finite(&rows, |r| r.total_trades)),
                worst_drawdown_pct: finite(&rows, |r| r.max_drawdown_pct).fold(f64::NAN, f64::min),
            })
        })
        .collect()
}

fn finite<'a>(
    rows: &'a [&'a BacktestRecord],
    value: fn(&BacktestRecord) -> f64,
) -> impl Iterator<Item = f64> + 'a {
    rows.iter().map(move |r| value(r)).filter(|v| v.is_finite())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}
