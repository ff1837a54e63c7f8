//! Integration tests for loading the result dataset from disk and for the
//! preparation round trip.

use std::io::Write;
use std::path::PathBuf;

use sahamlab_core::prepare::top_per_indicator;
use sahamlab_core::store::write_csv;
use sahamlab_core::{Indicator, IndicatorSet, Preset, ResultStore, StoreError};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_results.csv")
}

#[test]
fn loads_fixture_with_optional_columns() {
    let store = ResultStore::load(fixture()).unwrap();
    assert_eq!(store.len(), 12);
    assert_eq!(store.source(), Some(fixture().as_path()));

    let sto = store.get(0).unwrap();
    assert_eq!(sto.indicator, Some(Indicator::Sto));
    assert_eq!(sto.equity_final, Some(255_000_000.0));
    assert_eq!(sto.sortino, Some(0.81));
    assert_eq!(
        sto.max_drawdown_duration_span().map(|d| d.num_days()),
        Some(812)
    );

    let nan_row = store.get(9).unwrap();
    assert!(nan_row.sharpe.is_nan());
    assert!(nan_row.profit_factor.is_nan());
    assert_eq!(nan_row.sortino, None);
    assert_eq!(nan_row.max_drawdown_duration, None);
}

#[test]
fn fixture_covers_every_indicator() {
    let store = ResultStore::load(fixture()).unwrap();
    let counts = store.indicator_counts();
    for ind in Indicator::ALL {
        assert!(counts.get(&ind).copied().unwrap_or(0) > 0, "{ind} missing");
    }
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ResultStore::load(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, StoreError::Open { .. }));
}

#[test]
fn explicit_indicator_column_is_honored() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Indicator Settings,Indicator,Return [%],Return Ann [%],Sharpe Ratio,Max Drawdown [%],Total Trades,Win Rate [%],Profit Factor,Avg Trade [%]"
    )
    .unwrap();
    writeln!(file, "\"(14, 30, 70)\",RSI,50,4,0.4,-10,100,60,200,5").unwrap();
    writeln!(file, "fast=10 slow=50,SMACross,20,2,0.3,-5,80,55,90,2").unwrap();
    file.flush().unwrap();

    let store = ResultStore::load(file.path()).unwrap();
    assert_eq!(store.get(0).unwrap().indicator, Some(Indicator::Rsi));
    assert_eq!(store.get(1).unwrap().indicator, Some(Indicator::SmaCross));
    assert_eq!(store.indicator_counts().get(&Indicator::Rsi), Some(&1));
}

#[test]
fn indicator_column_does_not_widen_matches() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Indicator Settings,Indicator,Return [%],Return Ann [%],Sharpe Ratio,Max Drawdown [%],Total Trades,Win Rate [%],Profit Factor,Avg Trade [%]"
    )
    .unwrap();
    writeln!(file, "period=20 upper=100,CCI,50,4,0.4,-10,100,60,200,5").unwrap();
    writeln!(file, "CCI 20 -100 100,CCI,50,4,0.4,-10,100,60,200,5").unwrap();
    file.flush().unwrap();

    let store = ResultStore::load(file.path()).unwrap();
    assert_eq!(store.get(0).unwrap().indicator, Some(Indicator::Cci));
    assert!(store.get(0).unwrap().tags().is_empty());

    let mut only_cci = IndicatorSet::empty();
    only_cci.insert(Indicator::Cci);
    let view = Preset::NoFilter.filter_spec().with_indicators(only_cci).apply(&store);
    assert_eq!(view.rows(), &[1]);
}

#[test]
fn unknown_indicator_name_falls_back_to_settings_text() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Indicator Settings,Indicator,Return [%],Return Ann [%],Sharpe Ratio,Max Drawdown [%],Total Trades,Win Rate [%],Profit Factor,Avg Trade [%]"
    )
    .unwrap();
    writeln!(file, "Bollinger 20 2,Bollinger,50,4,0.4,-10,100,60,200,5").unwrap();
    writeln!(file, "RSI 14 30 70,Keltner,50,4,0.4,-10,100,60,200,5").unwrap();
    file.flush().unwrap();

    let store = ResultStore::load(file.path()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().indicator, None);
    assert_eq!(store.get(1).unwrap().indicator, Some(Indicator::Rsi));
}

#[test]
fn empty_metric_cell_loads_as_nan_and_never_matches() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Indicator Settings,Return [%],Return Ann [%],Sharpe Ratio,Max Drawdown [%],Total Trades,Win Rate [%],Profit Factor,Avg Trade [%]"
    )
    .unwrap();
    writeln!(file, "RSI 14 30 70,120,8,0.5,-10,200,70,,30").unwrap();
    writeln!(file, "RSI 5 39 91,120,8,0.5,-10,200,70,600,30").unwrap();
    file.flush().unwrap();

    let store = ResultStore::load(file.path()).unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.get(0).unwrap().profit_factor.is_nan());

    // Shown before any filter is applied, dropped by every preset.
    assert_eq!(store.all().len(), 2);
    for preset in Preset::ALL {
        assert!(!preset.filter_spec().apply(&store).rows().contains(&0));
    }
    assert_eq!(Preset::NoFilter.filter_spec().apply(&store).rows(), &[1]);
}

#[test]
fn prepared_dataset_reloads_and_filters() {
    let store = ResultStore::load(fixture()).unwrap();
    let prepared = top_per_indicator(store.records().to_vec(), 1);
    assert_eq!(prepared.len(), Indicator::ALL.len());

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("top.csv");
    write_csv(&prepared, std::fs::File::create(&out).unwrap()).unwrap();

    let reloaded = ResultStore::load(&out).unwrap();
    assert_eq!(reloaded.len(), prepared.len());
    let sharpes: Vec<f64> = reloaded.records().iter().map(|r| r.sharpe).collect();
    assert!(sharpes.windows(2).all(|w| w[0] >= w[1]), "{sharpes:?}");

    // The CCI winner has return 250, outside every preset.
    let view = Preset::NoFilter.filter_spec().apply(&reloaded);
    assert_eq!(view.len(), prepared.len() - 1);
}
