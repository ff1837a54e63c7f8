//! Named filter presets that pre-populate the eight range controls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::filter::{Bounds, FilterSpec, MetricRanges};
use crate::indicator::IndicatorSet;
use crate::metric::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Preset {
    #[default]
    NoFilter,
    ShortTerm,
    LongTerm,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::NoFilter, Preset::ShortTerm, Preset::LongTerm];

    pub fn label(self) -> &'static str {
        match self {
            Preset::NoFilter => "No Filter",
            Preset::ShortTerm => "Short Term",
            Preset::LongTerm => "Long Term",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::NoFilter => "Full slider range on every metric",
            Preset::ShortTerm => "Frequent trades, shallow drawdowns (daily to weekly holding)",
            Preset::LongTerm => "Few trades, high win rate and profit factor (monthly to yearly holding)",
        }
    }

    /// The preset's bounds, exactly as published.
    pub fn ranges(self) -> MetricRanges {
        use Metric::*;
        let b = Bounds::new;
        match self {
            Preset::NoFilter => MetricRanges::from([
                (Return, b(0.0, 200.0)),
                (ReturnAnn, b(0.0, 10.0)),
                (Sharpe, b(0.0, 1.0)),
                (MaxDrawdown, b(-70.0, 0.0)),
                (TotalTrades, b(0.0, 300.0)),
                (WinRate, b(0.0, 90.0)),
                (ProfitFactor, b(0.0, 2000.0)),
                (AvgTrade, b(0.0, 50.0)),
            ]),
            Preset::ShortTerm => MetricRanges::from([
                (Return, b(51.0, 200.0)),
                (ReturnAnn, b(2.0, 10.0)),
                (Sharpe, b(0.2, 1.0)),
                (MaxDrawdown, b(-50.0, 0.0)),
                (TotalTrades, b(150.0, 300.0)),
                (WinRate, b(50.0, 90.0)),
                (ProfitFactor, b(0.0, 2000.0)),
                (AvgTrade, b(0.0, 50.0)),
            ]),
            Preset::LongTerm => MetricRanges::from([
                (Return, b(100.0, 200.0)),
                (ReturnAnn, b(3.0, 10.0)),
                (Sharpe, b(0.3, 1.0)),
                (MaxDrawdown, b(-70.0, 0.0)),
                (TotalTrades, b(0.0, 120.0)),
                (WinRate, b(60.0, 90.0)),
                (ProfitFactor, b(300.0, 2000.0)),
                (AvgTrade, b(25.0, 50.0)),
            ]),
        }
    }

    /// Preset bounds with every indicator checked.
    pub fn filter_spec(self) -> FilterSpec {
        FilterSpec::new(self.ranges(), IndicatorSet::all())
    }

    pub fn next(self) -> Preset {
        match self {
            Preset::NoFilter => Preset::ShortTerm,
            Preset::ShortTerm => Preset::LongTerm,
            Preset::LongTerm => Preset::NoFilter,
        }
    }

    pub fn prev(self) -> Preset {
        match self {
            Preset::NoFilter => Preset::LongTerm,
            Preset::ShortTerm => Preset::NoFilter,
            Preset::LongTerm => Preset::ShortTerm,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "nofilter" | "none" => Ok(Preset::NoFilter),
            "shortterm" | "short" => Ok(Preset::ShortTerm),
            "longterm" | "long" => Ok(Preset::LongTerm),
            _ => Err(ParseError::UnknownPreset(s.to_string())),
        }
    }
}

impl TryFrom<String> for Preset {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Preset> for String {
    fn from(value: Preset) -> Self {
        value.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_term_table_is_exact() {
        let r = Preset::LongTerm.ranges();
        assert_eq!(r.get(Metric::Return), Bounds::new(100.0, 200.0));
        assert_eq!(r.get(Metric::ReturnAnn), Bounds::new(3.0, 10.0));
        assert_eq!(r.get(Metric::Sharpe), Bounds::new(0.3, 1.0));
        assert_eq!(r.get(Metric::MaxDrawdown), Bounds::new(-70.0, 0.0));
        assert_eq!(r.get(Metric::TotalTrades), Bounds::new(0.0, 120.0));
        assert_eq!(r.get(Metric::WinRate), Bounds::new(60.0, 90.0));
        assert_eq!(r.get(Metric::ProfitFactor), Bounds::new(300.0, 2000.0));
        assert_eq!(r.get(Metric::AvgTrade), Bounds::new(25.0, 50.0));
    }

    #[test]
    fn short_term_table_is_exact() {
        let r = Preset::ShortTerm.ranges();
        assert_eq!(r.get(Metric::Return), Bounds::new(51.0, 200.0));
        assert_eq!(r.get(Metric::ReturnAnn), Bounds::new(2.0, 10.0));
        assert_eq!(r.get(Metric::Sharpe), Bounds::new(0.2, 1.0));
        assert_eq!(r.get(Metric::MaxDrawdown), Bounds::new(-50.0, 0.0));
        assert_eq!(r.get(Metric::TotalTrades), Bounds::new(150.0, 300.0));
        assert_eq!(r.get(Metric::WinRate), Bounds::new(50.0, 90.0));
        assert_eq!(r.get(Metric::ProfitFactor), Bounds::new(0.0, 2000.0));
        assert_eq!(r.get(Metric::AvgTrade), Bounds::new(0.0, 50.0));
    }

    #[test]
    fn no_filter_spans_every_slider() {
        assert_eq!(Preset::NoFilter.ranges(), MetricRanges::full());
    }

    #[test]
    fn preset_values_sit_on_slider_grid() {
        for preset in Preset::ALL {
            for (metric, bounds) in preset.ranges().iter() {
                let c = metric.control();
                assert_eq!(c.snap(bounds.low), bounds.low, "{preset} {metric} low");
                assert_eq!(c.snap(bounds.high), bounds.high, "{preset} {metric} high");
            }
        }
    }

    #[test]
    fn presets_check_every_indicator() {
        for preset in Preset::ALL {
            assert_eq!(preset.filter_spec().indicators, IndicatorSet::all());
        }
    }

    #[test]
    fn parse_labels_and_keys() {
        assert_eq!("Long Term".parse::<Preset>().unwrap(), Preset::LongTerm);
        assert_eq!("short-term".parse::<Preset>().unwrap(), Preset::ShortTerm);
        assert_eq!("no_filter".parse::<Preset>().unwrap(), Preset::NoFilter);
        assert!("medium".parse::<Preset>().is_err());
    }

    #[test]
    fn cycle_round_trips() {
        for p in Preset::ALL {
            assert_eq!(p.next().prev(), p);
        }
    }
}
