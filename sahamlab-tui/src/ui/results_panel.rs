//! Backtest results — count line, row-cap note, and a sortable, read-only
//! table of the current view.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use sahamlab_core::{BacktestRecord, Column};

use crate::app::{AppState, Focus};
use crate::theme;

/// Columns shown in the table. The detail overlay shows the rest.
pub const TABLE_COLUMNS: [Column; 10] = [
    Column::Settings,
    Column::Return,
    Column::ReturnAnn,
    Column::Sharpe,
    Column::MaxDrawdown,
    Column::TotalTrades,
    Column::WinRate,
    Column::ProfitFactor,
    Column::AvgTrade,
    Column::EquityFinal,
];

fn width(column: Column) -> Constraint {
    match column {
        Column::Settings => Constraint::Min(18),
        Column::EquityFinal => Constraint::Length(12),
        Column::ProfitFactor => Constraint::Length(9),
        _ => Constraint::Length(8),
    }
}

fn cell_style(column: Column, record: &BacktestRecord) -> ratatui::style::Style {
    match column {
        Column::Sharpe => theme::sharpe_style(record.sharpe),
        Column::Return => theme::pnl_style(record.return_pct),
        Column::ReturnAnn => theme::pnl_style(record.return_ann_pct),
        Column::AvgTrade => theme::pnl_style(record.avg_trade_pct),
        Column::MaxDrawdown => theme::negative(),
        Column::WinRate => theme::win_rate_style(record.win_rate_pct),
        _ => theme::text(),
    }
}

/// The dataset keeps the best runs of each indicator only.
pub const ROW_CAP_NOTE: &str =
    "Only the top 10,000 runs of each indicator are included, ranked by Sharpe Ratio.";

pub fn render(f: &mut Frame, area: Rect, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let table_state = &app.table;
    let focused = app.focus == Focus::Table;

    // Count line and sort indicator.
    let mut header = vec![Span::styled(table_state.view.count_line(), theme::accent_bold())];
    match table_state.sort {
        Some((column, direction)) => header.push(Span::styled(
            format!("  sorted by {} {}", column.header(), direction.arrow()),
            theme::muted(),
        )),
        None => header.push(Span::styled("  unsorted", theme::muted())),
    }
    if app.form_is_dirty() {
        header.push(Span::styled("  (form changed, press a to apply)", theme::warning()));
    }
    f.render_widget(Paragraph::new(Line::from(header)), chunks[0]);
    f.render_widget(
        Paragraph::new(Span::styled(ROW_CAP_NOTE, theme::muted())),
        chunks[1],
    );

    if table_state.view.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No backtest matches these filters.",
                theme::muted(),
            )),
            chunks[2],
        );
        return;
    }

    // One header row; the rest hold records.
    let visible = chunks[2].height.saturating_sub(1) as usize;
    app.table.scroll_into_view(visible);
    let table_state = &app.table;

    let header_row = Row::new(TABLE_COLUMNS.iter().map(|c| {
        let mut label = c.short_header().to_string();
        if let Some((sorted, direction)) = table_state.sort {
            if sorted == *c {
                label.push_str(direction.arrow());
            }
        }
        Cell::from(label).style(theme::accent_bold())
    }));

    let start = table_state.scroll_offset;
    let end = (start + visible).min(table_state.view.len());
    let rows = (start..end).filter_map(|i| {
        let record = table_state.view.get(i)?;
        let is_cursor = focused && i == table_state.cursor;
        let cells = TABLE_COLUMNS.iter().map(|c| {
            let cell = Cell::from(c.cell(record));
            if is_cursor {
                cell
            } else {
                cell.style(cell_style(*c, record))
            }
        });
        let row = Row::new(cells);
        Some(if is_cursor { row.style(theme::selected()) } else { row })
    });

    let table = Table::new(rows, TABLE_COLUMNS.map(width))
        .header(header_row)
        .column_spacing(1);
    f.render_widget(table, chunks[2]);

    let hint = if focused {
        "[j/k]scroll [s/S]sort column [d]irection [u]nsort [Enter]detail [f]orm"
    } else {
        "[f] focus table"
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, theme::muted().add_modifier(Modifier::DIM))),
        chunks[3],
    );
}
