//! SahamLab CLI — query and prepare indicator backtest results.
//!
//! Commands:
//! - `filter` — apply a preset and per-metric ranges to a results CSV
//! - `presets` — print the preset bounds
//! - `report` — per-indicator statistics of a results CSV plus the study highlights
//! - `prepare` — cut a full results CSV down to the top runs per indicator

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use sahamlab_core::prepare::{top_per_indicator, DEFAULT_PER_INDICATOR};
use sahamlab_core::report::{indicator_stats, HIGHLIGHTS};
use sahamlab_core::store::write_csv;
use sahamlab_core::{
    logging, BacktestRecord, Bounds, Column, DashboardConfig, FilterSpec, FilteredView,
    Indicator, IndicatorSet, Metric, Preset, ResultStore, SortDirection,
};

#[derive(Parser)]
#[command(
    name = "sahamlab",
    about = "SahamLab CLI — filter IDX indicator backtest results"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./sahamlab.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for stderr. Overrides `[logging] level`; `RUST_LOG` wins over both.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a results CSV and print the matching rows.
    Filter(FilterArgs),
    /// Print the preset bounds.
    Presets,
    /// Print per-indicator statistics and the study highlight tables.
    Report {
        /// Results CSV. Defaults to `[data] path`.
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Keep the highest-Sharpe runs of each indicator.
    Prepare {
        /// Full results CSV.
        #[arg(long)]
        input: PathBuf,

        /// Where to write the cut dataset.
        #[arg(long)]
        output: PathBuf,

        /// Runs kept per indicator.
        #[arg(long, default_value_t = DEFAULT_PER_INDICATOR)]
        per_indicator: usize,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Results CSV. Defaults to `[data] path`.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Starting bounds: "No Filter", "Short Term" or "Long Term".
    #[arg(long, default_value_t = Preset::NoFilter)]
    preset: Preset,

    #[arg(long = "trades", value_name = "LO..HI", allow_hyphen_values = true)]
    trades: Option<Bounds>,
    #[arg(long = "drawdown", value_name = "LO..HI", allow_hyphen_values = true)]
    drawdown: Option<Bounds>,
    #[arg(long = "win-rate", value_name = "LO..HI", allow_hyphen_values = true)]
    win_rate: Option<Bounds>,
    #[arg(long = "return", value_name = "LO..HI", allow_hyphen_values = true)]
    return_pct: Option<Bounds>,
    #[arg(long = "sharpe", value_name = "LO..HI", allow_hyphen_values = true)]
    sharpe: Option<Bounds>,
    #[arg(long = "profit-factor", value_name = "LO..HI", allow_hyphen_values = true)]
    profit_factor: Option<Bounds>,
    #[arg(long = "return-ann", value_name = "LO..HI", allow_hyphen_values = true)]
    return_ann: Option<Bounds>,
    #[arg(long = "avg-trade", value_name = "LO..HI", allow_hyphen_values = true)]
    avg_trade: Option<Bounds>,

    /// Keep only these indicators (repeatable). Defaults to all five.
    #[arg(long = "indicator", conflicts_with = "no_indicators")]
    indicators: Vec<Indicator>,

    /// Select no indicator at all, which disables the indicator clause.
    #[arg(long, default_value_t = false)]
    no_indicators: bool,

    /// Sort column, by header or key (e.g. "sharpe", "Win Rate [%]").
    #[arg(long)]
    sort: Option<Column>,

    /// Sort descending.
    #[arg(long, default_value_t = false, requires = "sort")]
    desc: bool,

    /// Print at most this many rows.
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl FilterArgs {
    fn overrides(&self) -> [(Metric, Option<Bounds>); Metric::COUNT] {
        [
            (Metric::TotalTrades, self.trades),
            (Metric::MaxDrawdown, self.drawdown),
            (Metric::WinRate, self.win_rate),
            (Metric::Return, self.return_pct),
            (Metric::Sharpe, self.sharpe),
            (Metric::ProfitFactor, self.profit_factor),
            (Metric::ReturnAnn, self.return_ann),
            (Metric::AvgTrade, self.avg_trade),
        ]
    }

    /// Preset bounds, then per-metric overrides, then the indicator set.
    fn to_spec(&self) -> FilterSpec {
        let mut spec = self.preset.filter_spec();
        for (metric, bounds) in self.overrides() {
            if let Some(bounds) = bounds {
                spec = spec.with_range(metric, bounds);
            }
        }
        let indicators = if self.no_indicators {
            IndicatorSet::empty()
        } else if self.indicators.is_empty() {
            IndicatorSet::all()
        } else {
            let mut set = IndicatorSet::empty();
            for ind in &self.indicators {
                set.insert(*ind);
            }
            set
        };
        spec.with_indicators(indicators)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = DashboardConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init_stderr(level).context("failed to set up logging")?;

    match cli.command {
        Commands::Filter(args) => {
            let data = args.data.clone().unwrap_or_else(|| config.data.path.clone());
            run_filter(&data, &args)
        }
        Commands::Presets => {
            print!("{}", presets_table());
            Ok(())
        }
        Commands::Report { data } => run_report(&data.unwrap_or(config.data.path)),
        Commands::Prepare {
            input,
            output,
            per_indicator,
        } => run_prepare(&input, &output, per_indicator),
    }
}

fn load(path: &Path) -> Result<ResultStore> {
    ResultStore::load(path)
        .with_context(|| format!("failed to load results from {}", path.display()))
}

fn run_filter(data: &Path, args: &FilterArgs) -> Result<()> {
    let store = load(data)?;
    let spec = args.to_spec();
    if spec.is_unsatisfiable() {
        tracing::warn!(filter = %spec, "a low bound is above its high bound; nothing can match");
    }

    let view = filtered(&store, &spec, args.sort, args.desc);
    let limit = args.limit.unwrap_or(usize::MAX);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => {
            writeln!(out, "{}", view.count_line())?;
            write!(out, "{}", render_table(&view, limit))?;
        }
        OutputFormat::Csv => {
            write_csv(view.records().take(limit), &mut out)?;
        }
        OutputFormat::Json => {
            let output = FilterOutput {
                shown: view.len(),
                total: view.total(),
                filter: spec,
                rows: view.records().take(limit).collect(),
            };
            serde_json::to_writer_pretty(&mut out, &output)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Apply `spec`, then sort the view when a column is given.
fn filtered(
    store: &ResultStore,
    spec: &FilterSpec,
    sort: Option<Column>,
    desc: bool,
) -> FilteredView {
    let view = spec.apply(store);
    match sort {
        Some(column) => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            view.sorted_by(column, direction)
        }
        None => view,
    }
}

#[derive(Serialize)]
struct FilterOutput<'a> {
    shown: usize,
    total: usize,
    filter: FilterSpec,
    rows: Vec<&'a BacktestRecord>,
}

const TABLE_COLUMNS: [Column; 9] = [
    Column::Settings,
    Column::Return,
    Column::ReturnAnn,
    Column::Sharpe,
    Column::MaxDrawdown,
    Column::TotalTrades,
    Column::WinRate,
    Column::ProfitFactor,
    Column::AvgTrade,
];

fn render_table(view: &FilteredView, limit: usize) -> String {
    let mut s = String::new();
    let settings_width = view
        .records()
        .take(limit)
        .map(|r| r.settings.chars().count())
        .max()
        .unwrap_or(0)
        .max(Column::Settings.short_header().len());

    for column in TABLE_COLUMNS {
        match column {
            Column::Settings => s.push_str(&format!("{:<w$}", column.short_header(), w = settings_width)),
            _ => s.push_str(&format!(" {:>9}", column.short_header())),
        }
    }
    s.push('\n');
    s.push_str(&"-".repeat(settings_width + 10 * (TABLE_COLUMNS.len() - 1)));
    s.push('\n');

    for record in view.records().take(limit) {
        for column in TABLE_COLUMNS {
            match column {
                Column::Settings => s.push_str(&format!("{:<w$}", column.cell(record), w = settings_width)),
                _ => s.push_str(&format!(" {:>9}", column.cell(record))),
            }
        }
        s.push('\n');
    }
    s
}

fn presets_table() -> String {
    let mut s = String::new();
    s.push_str(&format!("{:<20}", "Metric"));
    for preset in Preset::ALL {
        s.push_str(&format!(" {:>18}", preset.label()));
    }
    s.push('\n');
    s.push_str(&"-".repeat(20 + 19 * Preset::ALL.len()));
    s.push('\n');

    for metric in Metric::ALL {
        s.push_str(&format!("{:<20}", metric.column_name()));
        let control = metric.control();
        for preset in Preset::ALL {
            let b = preset.ranges().get(metric);
            let cell = format!("{} – {}", control.format(b.low), control.format(b.high));
            s.push_str(&format!(" {:>18}", cell));
        }
        s.push('\n');
    }
    s.push('\n');
    for preset in Preset::ALL {
        s.push_str(&format!("{}: {}\n", preset.label(), preset.description()));
    }
    s
}

fn run_report(data: &Path) -> Result<()> {
    let store = load(data)?;
    let stats = indicator_stats(&store);

    println!("Loaded: {} ({} rows)", data.display(), store.len());
    println!();
    println!(
        "{:<10} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "Indicator", "Rows", "Best SR", "Ret%", "Win%", "Trades", "Worst DD"
    );
    println!("{}", "-".repeat(10 + 6 * 10 + 9));
    for s in &stats {
        println!(
            "{:<10} {:>8} {:>9.2} {:>9.2} {:>9.2} {:>9.1} {:>9.2}",
            s.indicator.token(),
            s.rows,
            s.best_sharpe,
            s.mean_return_pct,
            s.mean_win_rate_pct,
            s.mean_total_trades,
            s.worst_drawdown_pct
        );
    }

    for table in &HIGHLIGHTS {
        println!();
        println!("{} ({})", table.title, table.metric);
        for (indicator, settings) in &table.rows {
            println!("  {:<10}{}", indicator.token(), settings);
        }
    }
    Ok(())
}

fn run_prepare(input: &Path, output: &Path, per_indicator: usize) -> Result<()> {
    let store = load(input)?;
    let kept = top_per_indicator(store.records().to_vec(), per_indicator);

    let file = std::fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    write_csv(&kept, io::BufWriter::new(file))?;

    println!(
        "Kept {} of {} rows ({} per indicator) -> {}",
        kept.len(),
        store.len(),
        per_indicator,
        output.display()
    );
    Ok(())
}
