//! Filter query builder — typed range-and-indicator predicate over records.
//!
//! A `FilterSpec` holds one closed interval per metric plus a set of selected
//! indicators. A record matches when every metric lies inside its interval
//! and, unless no indicator is selected, the record carries at least one of
//! the selected indicators.
//!
//! An inverted interval (`low > high`) simply matches nothing. An empty
//! indicator selection matches every record.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::indicator::IndicatorSet;
use crate::metric::Metric;
use crate::preset::Preset;
use crate::record::BacktestRecord;
use crate::store::ResultStore;
use crate::view::FilteredView;

/// A closed numeric interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Inclusive on both ends. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    pub fn is_satisfiable(&self) -> bool {
        self.low <= self.high
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.low, self.high)
    }
}

impl FromStr for Bounds {
    type Err = ParseError;

    /// Parses `LOW..HIGH`, e.g. `-70..0` or `0.3..1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidBounds(s.to_string());
        let (low, high) = s.trim().split_once("..").ok_or_else(invalid)?;
        let low: f64 = low.trim().parse().map_err(|_| invalid())?;
        let high: f64 = high.trim().parse().map_err(|_| invalid())?;
        if low.is_nan() || high.is_nan() {
            return Err(invalid());
        }
        Ok(Bounds::new(low, high))
    }
}

/// One interval per metric, indexed by `Metric::index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRanges([Bounds; Metric::COUNT]);

impl MetricRanges {
    /// Each metric spans its full slider range.
    pub fn full() -> Self {
        let mut ranges = [Bounds::new(0.0, 0.0); Metric::COUNT];
        for m in Metric::ALL {
            let c = m.control();
            ranges[m.index()] = Bounds::new(c.min, c.max);
        }
        Self(ranges)
    }

    pub fn get(&self, metric: Metric) -> Bounds {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, bounds: Bounds) {
        self.0[metric.index()] = bounds;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Bounds)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

impl From<[(Metric, Bounds); Metric::COUNT]> for MetricRanges {
    fn from(pairs: [(Metric, Bounds); Metric::COUNT]) -> Self {
        let mut ranges = MetricRanges::full();
        for (m, b) in pairs {
            ranges.set(m, b);
        }
        ranges
    }
}

/// A complete filter submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub ranges: MetricRanges,
    pub indicators: IndicatorSet,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Preset::NoFilter.filter_spec()
    }
}

impl FilterSpec {
    pub fn new(ranges: MetricRanges, indicators: IndicatorSet) -> Self {
        Self { ranges, indicators }
    }

    pub fn with_range(mut self, metric: Metric, bounds: Bounds) -> Self {
        self.ranges.set(metric, bounds);
        self
    }

    pub fn with_indicators(mut self, indicators: IndicatorSet) -> Self {
        self.indicators = indicators;
        self
    }

    /// True when some interval is inverted, so no record can match.
    pub fn is_unsatisfiable(&self) -> bool {
        self.ranges.iter().any(|(_, b)| !b.is_satisfiable())
    }

    pub fn matches(&self, record: &BacktestRecord) -> bool {
        let in_ranges = self
            .ranges
            .iter()
            .all(|(metric, bounds)| bounds.contains(metric.value(record)));
        in_ranges && (self.indicators.is_empty() || record.tags().intersects(self.indicators))
    }

    /// Evaluate against the store, keeping store order.
    pub fn apply(&self, store: &ResultStore) -> FilteredView {
        let started = Instant::now();
        let rows: Vec<usize> = store
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(
            clause = %self,
            matched = rows.len(),
            total = store.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "filter evaluated"
        );
        FilteredView::from_rows(store.clone(), rows)
    }
}

impl fmt::Display for FilterSpec {
    /// Human-readable clause, e.g. for logs. Never executed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (metric, bounds) in self.ranges.iter() {
            if !first {
                f.write_str(" AND ")?;
            }
            first = false;
            write!(
                f,
                "\"{}\" BETWEEN {} AND {}",
                metric.column_name(),
                bounds.low,
                bounds.high
            )?;
        }
        if self.indicators.is_empty() {
            f.write_str(" AND TRUE")
        } else {
            write!(f, " AND indicator IN ({})", self.indicators)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::Indicator;

    fn mid_record(settings: &str) -> BacktestRecord {
        BacktestRecord::new(settings)
            .with_metric(Metric::Return, 50.0)
            .with_metric(Metric::ReturnAnn, 5.0)
            .with_metric(Metric::Sharpe, 0.5)
            .with_metric(Metric::MaxDrawdown, -20.0)
            .with_metric(Metric::TotalTrades, 100.0)
            .with_metric(Metric::WinRate, 60.0)
            .with_metric(Metric::ProfitFactor, 500.0)
            .with_metric(Metric::AvgTrade, 10.0)
            .tagged()
    }

    #[test]
    fn bounds_are_inclusive() {
        let b = Bounds::new(0.0, 10.0);
        assert!(b.contains(0.0));
        assert!(b.contains(10.0));
        assert!(!b.contains(10.000001));
        assert!(!b.contains(f64::NAN));
    }

    #[test]
    fn inverted_bounds_contain_nothing() {
        let b = Bounds::new(5.0, 1.0);
        assert!(!b.is_satisfiable());
        assert!(!b.contains(3.0));
        assert!(!b.contains(5.0));
    }

    #[test]
    fn bounds_parse_with_negatives_and_decimals() {
        assert_eq!("-70..0".parse::<Bounds>().unwrap(), Bounds::new(-70.0, 0.0));
        assert_eq!("0.3..1".parse::<Bounds>().unwrap(), Bounds::new(0.3, 1.0));
        assert_eq!(" 5 .. 2 ".parse::<Bounds>().unwrap(), Bounds::new(5.0, 2.0));
        assert!("10".parse::<Bounds>().is_err());
        assert!("a..b".parse::<Bounds>().is_err());
    }

    #[test]
    fn record_matches_default_filter() {
        let r = mid_record("RSI 14 30 70");
        assert!(FilterSpec::default().matches(&r));
    }

    #[test]
    fn empty_indicator_set_is_a_tautology() {
        let spec = FilterSpec::default().with_indicators(IndicatorSet::empty());
        assert!(spec.matches(&mid_record("RSI 14 30 70")));
        assert!(spec.matches(&mid_record("unlabelled run")));
    }

    #[test]
    fn indicator_clause_needs_one_selected_tag() {
        let spec = FilterSpec::default()
            .with_indicators([Indicator::Macd].into_iter().collect());
        assert!(spec.matches(&mid_record("MACD 12 26 9")));
        assert!(spec.matches(&mid_record("macd 5 35 5")));
        assert!(!spec.matches(&mid_record("RSI 14 30 70")));
    }

    #[test]
    fn any_inverted_range_rejects_everything() {
        let spec = FilterSpec::default().with_range(Metric::WinRate, Bounds::new(80.0, 20.0));
        assert!(spec.is_unsatisfiable());
        assert!(!spec.matches(&mid_record("RSI 14 30 70")));
    }

    #[test]
    fn display_renders_between_clauses() {
        let spec = Preset::LongTerm
            .filter_spec()
            .with_indicators([Indicator::Rsi, Indicator::Sto].into_iter().collect());
        let text = spec.to_string();
        assert!(text.starts_with("\"Total Trades\" BETWEEN 0 AND 120"));
        assert!(text.contains("\"Sharpe Ratio\" BETWEEN 0.3 AND 1"));
        assert!(text.ends_with("indicator IN (RSI, STO)"));

        let all = FilterSpec::default().with_indicators(IndicatorSet::empty());
        assert!(all.to_string().ends_with("AND TRUE"));
    }
}
