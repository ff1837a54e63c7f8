//! Help tab — keyboard shortcuts.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1 / 2 / 3", "Backtest, Report, Help tab");
    key(&mut lines, "Tab / Shift+Tab", "Cycle tabs forward / back");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Backtest: filter form");
    key(&mut lines, "f", "Switch focus between form and table");
    key(&mut lines, "j / k", "Move between form rows");
    key(&mut lines, "Space / Enter", "Toggle indicator, swap slider handle");
    key(&mut lines, "h / l", "Move the active handle one step");
    key(&mut lines, "H / L", "Move the active handle ten steps");
    key(&mut lines, "[ / ]", "Select low / high handle");
    key(&mut lines, "Home / End", "Jump handle to the slider end");
    key(&mut lines, "h / l on Preset", "Load the previous / next preset");
    key(&mut lines, "r", "Reset sliders to the selected preset");
    key(&mut lines, "a", "Apply filters");
    lines.push(Line::from(""));

    section(&mut lines, "Backtest: results table");
    key(&mut lines, "j / k", "Move row cursor");
    key(&mut lines, "PgUp / PgDn", "Move ten rows");
    key(&mut lines, "g / G", "First / last row");
    key(&mut lines, "s / S", "Sort by next / previous column");
    key(&mut lines, "d", "Flip sort direction");
    key(&mut lines, "u", "Back to dataset order");
    key(&mut lines, "Enter", "Show every column of the row");
    lines.push(Line::from(""));

    section(&mut lines, "Report");
    key(&mut lines, "j / k, PgUp / PgDn", "Scroll");
    key(&mut lines, "g", "Back to top");
    lines.push(Line::from(""));

    section(&mut lines, "Presets");
    key(&mut lines, "No Filter", "Every slider at its full range");
    key(&mut lines, "Short Term", "High win rate, many trades, modest return");
    key(&mut lines, "Long Term", "Few trades, high win rate and return, drawdown up to -70%");

    f.render_widget(Paragraph::new(lines), area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
