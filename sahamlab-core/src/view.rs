//! Filtered views — row selections over a result store.
//!
//! A view never copies or mutates records; it is a list of row indices
//! plus a handle to the store they index.

use crate::record::{BacktestRecord, Column, SortDirection};
use crate::store::ResultStore;

#[derive(Debug, Clone)]
pub struct FilteredView {
    store: ResultStore,
    rows: Vec<usize>,
}

impl FilteredView {
    /// Rows must be valid indices into `store`.
    pub(crate) fn from_rows(store: ResultStore, rows: Vec<usize>) -> Self {
        debug_assert!(rows.iter().all(|&r| r < store.len()));
        Self { store, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Size of the underlying store.
    pub fn total(&self) -> usize {
        self.store.len()
    }

    /// `Showing K of N.`
    pub fn count_line(&self) -> String {
        format!("Showing {} of {}.", self.len(), self.total())
    }

    /// Store row indices, in view order.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// The record at position `i` of the view.
    pub fn get(&self, i: usize) -> Option<&BacktestRecord> {
        self.rows.get(i).and_then(|&row| self.store.get(row))
    }

    pub fn records(&self) -> impl Iterator<Item = &BacktestRecord> + '_ {
        self.rows.iter().filter_map(|&row| self.store.get(row))
    }

    /// A copy of this view, stably sorted on one column.
    pub fn sorted_by(&self, column: Column, direction: SortDirection) -> FilteredView {
        let mut rows = self.rows.clone();
        let records = self.store.records();
        rows.sort_by(|&a, &b| column.compare(&records[a], &records[b], direction));
        FilteredView::from_rows(self.store.clone(), rows)
    }

    /// Restore store order.
    pub fn unsorted(&self) -> FilteredView {
        let mut rows = self.rows.clone();
        rows.sort_unstable();
        FilteredView::from_rows(self.store.clone(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Metric;

    fn store() -> ResultStore {
        ResultStore::from_records(vec![
            BacktestRecord::new("RSI a").with_metric(Metric::Sharpe, 0.5),
            BacktestRecord::new("CCI b").with_metric(Metric::Sharpe, 0.2),
            BacktestRecord::new("STO c").with_metric(Metric::Sharpe, 0.5),
            BacktestRecord::new("MACD d").with_metric(Metric::Sharpe, 0.9),
        ])
    }

    #[test]
    fn all_view_keeps_store_order() {
        let view = store().all();
        assert_eq!(view.rows(), &[0, 1, 2, 3]);
        assert_eq!(view.count_line(), "Showing 4 of 4.");
    }

    #[test]
    fn sort_is_stable_and_keeps_membership() {
        let view = store().all();
        let asc = view.sorted_by(Column::Sharpe, SortDirection::Ascending);
        assert_eq!(asc.rows(), &[1, 0, 2, 3]);

        let desc = view.sorted_by(Column::Sharpe, SortDirection::Descending);
        assert_eq!(desc.rows(), &[3, 0, 2, 1]);

        assert_eq!(desc.unsorted().rows(), view.rows());
        assert_eq!(desc.len(), view.len());
    }

    #[test]
    fn get_follows_view_order() {
        let view = store().all().sorted_by(Column::Settings, SortDirection::Ascending);
        let settings: Vec<&str> = view.records().map(|r| r.settings.as_str()).collect();
        assert_eq!(settings, vec!["CCI b", "MACD d", "RSI a", "STO c"]);
        assert_eq!(view.get(0).unwrap().settings, "CCI b");
        assert!(view.get(4).is_none());
    }
}
