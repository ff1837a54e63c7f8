//! Overlay widgets — welcome and row detail.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use sahamlab_core::report::STUDY_RUNS;
use sahamlab_core::Column;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(60, 45, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Welcome to SahamLab ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} backtests loaded (study total: {}).",
                app.store.len(),
                STUDY_RUNS
            ),
            theme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled(
            "  1. Pick indicators and a preset in the Filters sidebar",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  2. Fine-tune the sliders with h / l",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  3. Press a to apply, f to move into the table",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  4. Press 2 for the research report, 3 for help",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Every column of one row of the current view.
pub fn render_detail(f: &mut Frame, area: Rect, app: &AppState, idx: usize) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(
            " Row {} of {} [j/k]step [Esc]close ",
            idx + 1,
            app.table.view.len()
        ))
        .title_style(theme::accent_bold());

    let Some(record) = app.table.view.get(idx) else {
        let para = Paragraph::new(Span::styled("Row no longer in view.", theme::muted()))
            .block(block);
        f.render_widget(para, popup);
        return;
    };

    let mut lines: Vec<Line> = vec![Line::from("")];
    for column in Column::ALL {
        let value = column.cell(record);
        let style = match column {
            Column::Sharpe => theme::sharpe_style(record.sharpe),
            Column::Return => theme::pnl_style(record.return_pct),
            Column::ReturnAnn => theme::pnl_style(record.return_ann_pct),
            Column::WinRate => theme::win_rate_style(record.win_rate_pct),
            Column::MaxDrawdown => theme::negative(),
            _ => theme::text(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<24}", column.header()), theme::muted()),
            Span::styled(value, style),
        ]));
    }

    if let Some(span) = record.max_drawdown_duration_span() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<24}", "Drawdown days"), theme::muted()),
            Span::styled(span.num_days().to_string(), theme::text()),
        ]));
    }

    let tags: Vec<&str> = record.tags().iter().map(|i| i.token()).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<24}", "Tags"), theme::muted()),
        Span::styled(
            if tags.is_empty() { "-".to_string() } else { tags.join(", ") },
            theme::neutral(),
        ),
    ]));

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}
