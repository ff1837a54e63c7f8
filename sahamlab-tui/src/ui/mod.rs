//! Top-level UI layout — tab bar, active tab, status bar and overlays.

pub mod filter_panel;
pub mod help_panel;
pub mod overlays;
pub mod report_panel;
pub mod results_panel;
pub mod status_bar;
pub mod widgets;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

use crate::app::{AppState, Focus, Overlay, Panel};
use crate::theme;

/// Width of the filter sidebar on the Backtest tab.
const SIDEBAR_WIDTH: u16 = 46;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area, app),
        Overlay::Detail(idx) => overlays::render_detail(f, main_area, app, idx),
        Overlay::None => {}
    }
}

fn tab_titles(active: Panel) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, panel) in Panel::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", theme::muted()));
        }
        let style = theme::panel_title(*panel == active);
        spans.push(Span::styled(format!("{} [{}]", panel.label(), i + 1), style));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

/// Draw the active tab inside the outer frame.
fn draw_panel(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(tab_titles(app.active_panel));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.active_panel {
        Panel::Backtest => draw_backtest(f, inner, app),
        Panel::Report => report_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner),
    }
}

/// Filter sidebar on the left, results on the right.
fn draw_backtest(f: &mut Frame, area: Rect, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);

    let form_focused = app.focus == Focus::Form;
    let sidebar = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(form_focused))
        .title(" Filters ")
        .title_style(theme::panel_title(form_focused));
    let sidebar_inner = sidebar.inner(chunks[0]);
    f.render_widget(sidebar, chunks[0]);
    filter_panel::render(f, sidebar_inner, app);

    let table = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(!form_focused))
        .title(" Results ")
        .title_style(theme::panel_title(!form_focused));
    let table_inner = table.inner(chunks[1]);
    f.render_widget(table, chunks[1]);
    results_panel::render(f, table_inner, app);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::sample_store;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sahamlab_core::Preset;

    fn screen(app: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
    }

    #[test]
    fn backtest_tab_shows_count_line_and_form() {
        let mut app = AppState::new(sample_store(), Preset::NoFilter, false);
        let out = screen(&mut app, 140, 45);
        assert!(out.contains("Showing 4 of 4."));
        assert!(out.contains("Filters"));
        assert!(out.contains("Apply Filters"));
        assert!(out.contains("Sharpe Ratio"));
    }

    #[test]
    fn report_and_help_tabs_render() {
        let mut app = AppState::new(sample_store(), Preset::NoFilter, false);
        app.active_panel = Panel::Report;
        assert!(screen(&mut app, 120, 40).contains("Backtests run"));
        app.active_panel = Panel::Help;
        assert!(screen(&mut app, 120, 40).contains("Flip sort direction"));
    }

    #[test]
    fn results_show_row_cap_note_under_count_line() {
        let mut app = AppState::new(sample_store(), Preset::NoFilter, false);
        let out = screen(&mut app, 180, 45);
        let count = out.find("Showing 4 of 4.").unwrap();
        let note = out.find(results_panel::ROW_CAP_NOTE).unwrap();
        assert!(count < note);
    }

    #[test]
    fn report_heading_and_long_term_help_text() {
        let mut app = AppState::new(sample_store(), Preset::NoFilter, false);
        app.active_panel = Panel::Report;
        app.report_scroll = 0;
        let mut found = false;
        for _ in 0..40 {
            if screen(&mut app, 120, 40).contains("Study highlights") {
                found = true;
                break;
            }
            app.report_scroll += 30;
        }
        assert!(found);

        app.active_panel = Panel::Help;
        let help = screen(&mut app, 120, 60);
        assert!(help.contains("drawdown up to -70%"));
        assert!(!help.contains("shallow drawdown"));
    }

    #[test]
    fn welcome_overlay_drawn_on_top() {
        let mut app = AppState::new(sample_store(), Preset::NoFilter, true);
        assert!(screen(&mut app, 120, 40).contains("Welcome to SahamLab"));
    }

    #[test]
    fn empty_view_says_so() {
        let mut app = AppState::new(sample_store(), Preset::NoFilter, false);
        app.form.indicators = sahamlab_core::IndicatorSet::empty();
        app.form
            .ranges
            .set(sahamlab_core::Metric::Sharpe, sahamlab_core::Bounds::new(0.9, 0.1));
        app.submit();
        let out = screen(&mut app, 140, 45);
        assert!(out.contains("Showing 0 of 4."));
        assert!(out.contains("No backtest matches these filters."));
    }
}
