//! Indicator vocabulary and per-record indicator tags.
//!
//! The study covers five technical indicators. Each result row names its
//! indicator inside a free-text settings string such as `"RSI 14 30 70"`.
//! Tags are derived from that text once, at load time, so that filtering is
//! a set intersection rather than a text search.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One of the five indicators covered by the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Indicator {
    Cci,
    Rsi,
    Macd,
    Sto,
    SmaCross,
}

impl Indicator {
    /// All indicators, in checkbox order.
    pub const ALL: [Indicator; 5] = [
        Indicator::Cci,
        Indicator::Rsi,
        Indicator::Macd,
        Indicator::Sto,
        Indicator::SmaCross,
    ];

    /// Short token as it appears in the settings text.
    pub fn token(self) -> &'static str {
        match self {
            Indicator::Cci => "CCI",
            Indicator::Rsi => "RSI",
            Indicator::Macd => "MACD",
            Indicator::Sto => "STO",
            Indicator::SmaCross => "SMACross",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Indicator::Cci => "Commodity Channel Index",
            Indicator::Rsi => "Relative Strength Index",
            Indicator::Macd => "Moving Average Convergence Divergence",
            Indicator::Sto => "Full Stochastic Oscillator",
            Indicator::SmaCross => "Double SMA Crossover",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Indicator::Cci => 1 << 0,
            Indicator::Rsi => 1 << 1,
            Indicator::Macd => 1 << 2,
            Indicator::Sto => 1 << 3,
            Indicator::SmaCross => 1 << 4,
        }
    }

    /// The indicator whose token occurs first in `text`, ignoring case.
    pub fn detect(text: &str) -> Option<Indicator> {
        let upper = text.to_ascii_uppercase();
        Indicator::ALL
            .iter()
            .filter_map(|ind| {
                upper
                    .find(&ind.token().to_ascii_uppercase())
                    .map(|pos| (pos, *ind))
            })
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, ind)| ind)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Indicator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "cci" => Ok(Indicator::Cci),
            "rsi" => Ok(Indicator::Rsi),
            "macd" => Ok(Indicator::Macd),
            "sto" | "stoch" | "stochastic" => Ok(Indicator::Sto),
            "smacross" | "doublesma" | "sma" => Ok(Indicator::SmaCross),
            _ => Err(ParseError::UnknownIndicator(s.to_string())),
        }
    }
}

impl TryFrom<String> for Indicator {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Indicator> for String {
    fn from(value: Indicator) -> Self {
        value.token().to_string()
    }
}

/// A set of indicators, stored as a bitmask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Indicator>", into = "Vec<Indicator>")]
pub struct IndicatorSet(u8);

impl IndicatorSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Indicator::ALL.into_iter().collect()
    }

    /// Every indicator whose token occurs in `text`, ignoring case.
    pub fn tags_in(text: &str) -> Self {
        let upper = text.to_ascii_uppercase();
        Indicator::ALL
            .into_iter()
            .filter(|ind| upper.contains(&ind.token().to_ascii_uppercase()))
            .collect()
    }

    pub fn insert(&mut self, indicator: Indicator) {
        self.0 |= indicator.bit();
    }

    pub fn remove(&mut self, indicator: Indicator) {
        self.0 &= !indicator.bit();
    }

    /// Flip membership; returns whether the indicator is now in the set.
    pub fn toggle(&mut self, indicator: Indicator) -> bool {
        self.0 ^= indicator.bit();
        self.contains(indicator)
    }

    pub fn contains(self, indicator: Indicator) -> bool {
        self.0 & indicator.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn intersects(self, other: IndicatorSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: IndicatorSet) -> IndicatorSet {
        IndicatorSet(self.0 | other.0)
    }

    /// Members in checkbox order.
    pub fn iter(self) -> impl Iterator<Item = Indicator> {
        Indicator::ALL.into_iter().filter(move |ind| self.contains(*ind))
    }
}

impl FromIterator<Indicator> for IndicatorSet {
    fn from_iter<I: IntoIterator<Item = Indicator>>(iter: I) -> Self {
        let mut set = IndicatorSet::empty();
        for ind in iter {
            set.insert(ind);
        }
        set
    }
}

impl From<Vec<Indicator>> for IndicatorSet {
    fn from(value: Vec<Indicator>) -> Self {
        value.into_iter().collect()
    }
}

impl From<IndicatorSet> for Vec<Indicator> {
    fn from(value: IndicatorSet) -> Self {
        value.iter().collect()
    }
}

impl fmt::Debug for IndicatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for IndicatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let tokens: Vec<&str> = self.iter().map(Indicator::token).collect();
        f.write_str(&tokens.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("rsi".parse::<Indicator>().unwrap(), Indicator::Rsi);
        assert_eq!("SMACross".parse::<Indicator>().unwrap(), Indicator::SmaCross);
        assert_eq!("sma-cross".parse::<Indicator>().unwrap(), Indicator::SmaCross);
        assert_eq!("Stochastic".parse::<Indicator>().unwrap(), Indicator::Sto);
        assert!("bollinger".parse::<Indicator>().is_err());
    }

    #[test]
    fn tags_match_tokens_anywhere_ignoring_case() {
        let tags = IndicatorSet::tags_in("rsi 14 30 70");
        assert!(tags.contains(Indicator::Rsi));
        assert_eq!(tags.len(), 1);

        let tags = IndicatorSet::tags_in("SMACross(10, 50)");
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![Indicator::SmaCross]);

        assert!(IndicatorSet::tags_in("Bollinger 20 2").is_empty());
    }

    #[test]
    fn detect_prefers_earliest_token() {
        assert_eq!(Indicator::detect("MACD 12 26 9"), Some(Indicator::Macd));
        assert_eq!(Indicator::detect("sto over rsi"), Some(Indicator::Sto));
        assert_eq!(Indicator::detect("nothing here"), None);
    }

    #[test]
    fn set_operations() {
        let mut set = IndicatorSet::empty();
        assert!(set.is_empty());
        assert!(set.toggle(Indicator::Cci));
        set.insert(Indicator::Macd);
        assert_eq!(set.len(), 2);
        assert!(!set.toggle(Indicator::Cci));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Indicator::Macd]);

        let all = IndicatorSet::all();
        assert_eq!(all.len(), 5);
        assert!(all.intersects(set));
        assert!(!IndicatorSet::empty().intersects(all));
        assert_eq!(all.to_string(), "CCI, RSI, MACD, STO, SMACross");
        assert_eq!(IndicatorSet::empty().to_string(), "(none)");
    }

    #[test]
    fn set_serializes_as_token_list() {
        let set: IndicatorSet = [Indicator::Rsi, Indicator::Sto].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["RSI","STO"]"#);
        let back: IndicatorSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
