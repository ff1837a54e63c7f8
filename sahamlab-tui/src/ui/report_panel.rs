//! Report tab — the study write-up, per-indicator highlight tables and
//! statistics computed from the loaded store.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use sahamlab_core::report::{
    self, ALLOCATION_PER_TRADE_PCT, HIGHLIGHTS, INITIAL_CAPITAL_IDR, SECTIONS, STUDY_RUNS,
    STUDY_TICKERS,
};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "Technical indicator backtests on IDX stocks",
        theme::accent_bold(),
    )));
    lines.push(Line::from(""));
    fact(&mut lines, "Backtests run", STUDY_RUNS.to_string());
    fact(
        &mut lines,
        "Period",
        format!("{} to {}", report::study_start(), report::study_end()),
    );
    fact(&mut lines, "Tickers", STUDY_TICKERS.join(", "));
    fact(&mut lines, "Initial capital", format!("IDR {}", INITIAL_CAPITAL_IDR));
    fact(
        &mut lines,
        "Allocation per trade",
        format!("{ALLOCATION_PER_TRADE_PCT:.0}% of equity"),
    );
    fact(&mut lines, "Rows loaded", app.store.len().to_string());
    lines.push(Line::from(""));

    for section in SECTIONS {
        lines.push(Line::from(Span::styled(section.title, theme::accent_bold())));
        for paragraph in section.paragraphs {
            lines.push(Line::from(Span::styled(*paragraph, theme::text())));
            lines.push(Line::from(""));
        }
    }

    lines.push(Line::from(Span::styled("Study highlights", theme::accent_bold())));
    for table in &HIGHLIGHTS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", table.title), theme::neutral()),
            Span::styled(format!(" ({})", table.metric), theme::muted()),
        ]));
        for (indicator, settings) in &table.rows {
            lines.push(Line::from(vec![
                Span::styled(format!("    {:<10}", indicator.token()), theme::accent()),
                Span::styled(*settings, theme::text()),
            ]));
        }
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Loaded data by indicator",
        theme::accent_bold(),
    )));
    lines.push(Line::from(Span::styled(
        format!(
            "    {:<10}{:>8}{:>10}{:>10}{:>10}{:>10}{:>10}",
            "", "Rows", "Best SR", "Ret%", "Win%", "Trades", "Worst DD"
        ),
        theme::muted(),
    )));
    for stats in &app.stats {
        lines.push(Line::from(vec![
            Span::styled(format!("    {:<10}", stats.indicator.token()), theme::accent()),
            Span::styled(format!("{:>8}", stats.rows), theme::text()),
            Span::styled(
                format!("{:>10.2}", stats.best_sharpe),
                theme::sharpe_style(stats.best_sharpe),
            ),
            Span::styled(
                format!("{:>10.2}", stats.mean_return_pct),
                theme::pnl_style(stats.mean_return_pct),
            ),
            Span::styled(
                format!("{:>10.2}", stats.mean_win_rate_pct),
                theme::win_rate_style(stats.mean_win_rate_pct),
            ),
            Span::styled(format!("{:>10.1}", stats.mean_total_trades), theme::text()),
            Span::styled(format!("{:>10.2}", stats.worst_drawdown_pct), theme::negative()),
        ]));
    }

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.report_scroll, 0));
    f.render_widget(para, area);
}

fn fact<'a>(lines: &mut Vec<Line<'a>>, label: &str, value: String) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<22}", label), theme::muted()),
        Span::styled(value, theme::text()),
    ]));
}
