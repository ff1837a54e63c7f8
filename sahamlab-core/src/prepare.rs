//! Offline dataset preparation: the top-N-per-indicator cut by Sharpe.
//!
//! The full study has far more runs than the dashboard shows. The shipped
//! dataset keeps the best `n` runs of each indicator, ranked by Sharpe
//! Ratio, and lists them Sharpe-descending.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::indicator::Indicator;
use crate::record::BacktestRecord;

/// Default cut used for the shipped dataset.
pub const DEFAULT_PER_INDICATOR: usize = 10_000;

fn sharpe_desc(a: &BacktestRecord, b: &BacktestRecord) -> Ordering {
    match (a.sharpe.is_nan(), b.sharpe.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.sharpe.total_cmp(&a.sharpe),
    }
}

/// Keep the `per_indicator` highest-Sharpe records of each indicator.
///
/// Records with no recognizable indicator are dropped. The output is
/// sorted by Sharpe descending; ties keep input order.
pub fn top_per_indicator(records: Vec<BacktestRecord>, per_indicator: usize) -> Vec<BacktestRecord> {
    let input_len = records.len();
    let mut groups: BTreeMap<Indicator, Vec<BacktestRecord>> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in records.into_iter().map(BacktestRecord::tagged) {
        match record.indicator {
            Some(ind) => groups.entry(ind).or_default().push(record),
            None => dropped += 1,
        }
    }

    let mut kept: Vec<BacktestRecord> = Vec::new();
    for (ind, mut group) in groups {
        group.sort_by(sharpe_desc);
        group.truncate(per_indicator);
        tracing::debug!(indicator = %ind, kept = group.len(), "indicator group cut");
        kept.extend(group);
    }
    kept.sort_by(sharpe_desc);

    tracing::info!(
        input = input_len,
        kept = kept.len(),
        dropped_untagged = dropped,
        per_indicator,
        "dataset prepared"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Metric;

    fn rec(settings: &str, sharpe: f64) -> BacktestRecord {
        BacktestRecord::new(settings).with_metric(Metric::Sharpe, sharpe)
    }

    #[test]
    fn keeps_best_n_per_indicator_sorted_desc() {
        let input = vec![
            rec("RSI 1", 0.1),
            rec("RSI 2", 0.9),
            rec("RSI 3", 0.5),
            rec("CCI 1", 0.3),
            rec("CCI 2", 0.7),
            rec("CCI 3", 0.2),
            rec("mystery", 5.0),
        ];
        let out = top_per_indicator(input, 2);
        let names: Vec<&str> = out.iter().map(|r| r.settings.as_str()).collect();
        assert_eq!(names, vec!["RSI 2", "CCI 2", "RSI 3", "CCI 1"]);
    }

    #[test]
    fn nan_sharpe_sorts_last() {
        let out = top_per_indicator(vec![rec("STO a", f64::NAN), rec("STO b", -0.2)], 5);
        assert_eq!(out[0].settings, "STO b");
        assert!(out[1].sharpe.is_nan());
    }

    #[test]
    fn zero_cut_keeps_nothing() {
        assert!(top_per_indicator(vec![rec("MACD", 0.4)], 0).is_empty());
    }
}
