//! Result store — the immutable in-memory dataset of backtest records.
//!
//! Loaded once from CSV at startup. Cloning a store is cheap (the records
//! sit behind an `Arc`), so views can hold their own handle to it.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::error::StoreError;
use crate::indicator::Indicator;
use crate::record::{BacktestRecord, REQUIRED_COLUMNS};
use crate::view::FilteredView;

#[derive(Debug, Clone)]
pub struct ResultStore {
    records: Arc<[BacktestRecord]>,
    source: Option<PathBuf>,
}

impl ResultStore {
    /// Load a dataset from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let started = Instant::now();
        let file = File::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut store = Self::from_reader(file)?;
        store.source = Some(path.to_path_buf());
        tracing::info!(
            path = %path.display(),
            rows = store.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset loaded"
        );
        Ok(store)
    }

    /// Parse CSV from any reader. The header row must carry every
    /// filterable column.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers().map_err(StoreError::Header)?.clone();
        for (name, aliases) in REQUIRED_COLUMNS {
            let present = headers
                .iter()
                .any(|h| h == name || aliases.contains(&h));
            if !present {
                return Err(StoreError::MissingColumn(name));
            }
        }

        let mut records = Vec::new();
        for row in rdr.deserialize::<BacktestRecord>() {
            match row {
                Ok(record) => records.push(record),
                Err(source) => {
                    let line = source.position().map(|p| p.line()).unwrap_or(0);
                    return Err(StoreError::Row { line, source });
                }
            }
        }
        Ok(Self::from_records(records))
    }

    /// Build a store from records already in memory, tagging each one.
    pub fn from_records(records: Vec<BacktestRecord>) -> Self {
        let records: Vec<BacktestRecord> = records.into_iter().map(BacktestRecord::tagged).collect();
        Self {
            records: records.into(),
            source: None,
        }
    }

    pub fn records(&self) -> &[BacktestRecord] {
        &self.records
    }

    pub fn get(&self, row: usize) -> Option<&BacktestRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// File the store was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// A view over every row, in store order.
    pub fn all(&self) -> FilteredView {
        FilteredView::from_rows(self.clone(), (0..self.len()).collect())
    }

    /// Row count per primary indicator. Untagged rows are not counted.
    pub fn indicator_counts(&self) -> BTreeMap<Indicator, usize> {
        let mut counts = BTreeMap::new();
        for ind in self.records.iter().filter_map(|r| r.indicator) {
            *counts.entry(ind).or_insert(0) += 1;
        }
        counts
    }
}

/// Write records as CSV with the dataset's column headers.
pub fn write_csv<W: std::io::Write>(
    records: impl IntoIterator<Item = impl std::borrow::Borrow<BacktestRecord>>,
    writer: W,
) -> Result<(), StoreError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record.borrow())?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Indicator Settings,Return [%],Return Ann [%],Sharpe Ratio,Max Drawdown [%],Total Trades,Win Rate [%],Profit Factor,Avg Trade [%]";

    #[test]
    fn loads_minimal_columns() {
        let csv = format!("{HEADER}\nRSI 14 30 70,120,8,0.5,-10,200,70,600,30\nMACD 12 26 9,10,1,0.1,-40,50,40,100,5\n");
        let store = ResultStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        let r = store.get(0).unwrap();
        assert_eq!(r.return_pct, 120.0);
        assert_eq!(r.indicator, Some(Indicator::Rsi));
        assert_eq!(r.sortino, None);
        assert_eq!(store.get(1).unwrap().indicator, Some(Indicator::Macd));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let csv = "Indicator Settings,Return [%]\nRSI,1\n";
        let err = ResultStore::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn("Return Ann [%]")));
    }

    #[test]
    fn malformed_row_reports_line() {
        let csv = format!("{HEADER}\nRSI,1,1,0.1,-1,10,50,100,1\nCCI,oops,1,0.1,-1,10,50,100,1\n");
        match ResultStore::from_reader(csv.as_bytes()).unwrap_err() {
            StoreError::Row { line, .. } => assert_eq!(line, 3),
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn aliased_headers_are_accepted() {
        let csv = "Indicator Settings,Return [%],Return (Ann.) [%],Sharpe Ratio,Max. Drawdown [%],# Trades,Win Rate [%],Profit Factor,Avg. Trade [%],Equity Final [Rp]\nSTO 14 3 3,5,1,0.2,-3,12,55,120,2,105000000\n";
        let store = ResultStore::from_reader(csv.as_bytes()).unwrap();
        let r = store.get(0).unwrap();
        assert_eq!(r.total_trades, 12.0);
        assert_eq!(r.max_drawdown_pct, -3.0);
        assert_eq!(r.equity_final, Some(105_000_000.0));
    }

    #[test]
    fn counts_rows_per_indicator() {
        let store = ResultStore::from_records(vec![
            BacktestRecord::new("RSI 7"),
            BacktestRecord::new("RSI 14"),
            BacktestRecord::new("CCI 20"),
            BacktestRecord::new("unknown"),
        ]);
        let counts = store.indicator_counts();
        assert_eq!(counts.get(&Indicator::Rsi), Some(&2));
        assert_eq!(counts.get(&Indicator::Cci), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 3);
    }

    #[test]
    fn written_csv_loads_back() {
        let store = ResultStore::from_records(vec![BacktestRecord::new("SMACross 10 50")]);
        let mut buf = Vec::new();
        write_csv(store.records(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Indicator Settings,Equity Final,Return [%]"));
        let back = ResultStore::from_reader(text.as_bytes()).unwrap();
        assert_eq!(back.records(), store.records());
    }
}
