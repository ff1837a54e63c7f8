//! Backtest sidebar — indicator checkboxes, preset selector, eight range
//! sliders and the Apply button.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Focus, FormRow, FORM_ROWS};
use crate::theme;
use crate::ui::widgets::slider::RangeSlider;

/// Rows needed to give every slider a blank line beneath it.
const ROOMY_HEIGHT: u16 = 36;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.form;
    let focused = app.focus == Focus::Form;
    let roomy = area.height >= ROOMY_HEIGHT;
    let mut y = area.y;
    let bottom = area.y + area.height;

    let line = |f: &mut Frame, y: &mut u16, content: Line<'static>| {
        if *y < bottom {
            f.render_widget(Paragraph::new(content), Rect::new(area.x, *y, area.width, 1));
            *y += 1;
        }
    };

    line(f, &mut y, Line::from(Span::styled("Indicators", theme::accent_bold())));

    for (idx, row) in FORM_ROWS.iter().enumerate() {
        let is_cursor = focused && idx == form.cursor;
        let row_style = if is_cursor { theme::selected() } else { theme::text() };

        match *row {
            FormRow::Indicator(ind) => {
                let mark = if form.indicators.contains(ind) { "[x]" } else { "[ ]" };
                line(
                    f,
                    &mut y,
                    Line::from(vec![
                        Span::styled(format!(" {mark} {:<9}", ind.token()), row_style),
                        Span::styled(format!(" {}", ind.full_name()), theme::muted()),
                    ]),
                );
            }
            FormRow::Preset => {
                line(f, &mut y, Line::from(""));
                line(
                    f,
                    &mut y,
                    Line::from(vec![
                        Span::styled("Preset ", theme::accent_bold()),
                        Span::styled(format!("< {} >", form.preset), row_style),
                    ]),
                );
                line(
                    f,
                    &mut y,
                    Line::from(Span::styled(form.preset.description(), theme::muted())),
                );
                line(f, &mut y, Line::from(""));
            }
            FormRow::Slider(metric) => {
                if y + 2 <= bottom {
                    let slider = RangeSlider::new(metric, form.ranges.get(metric))
                        .focused(is_cursor, form.handle);
                    f.render_widget(slider, Rect::new(area.x, y, area.width, 2));
                    y += 2;
                }
                if roomy {
                    line(f, &mut y, Line::from(""));
                }
            }
            FormRow::Apply => {
                let style = if is_cursor {
                    theme::selected()
                } else if app.form_is_dirty() {
                    theme::warning().add_modifier(Modifier::BOLD)
                } else {
                    theme::accent()
                };
                let label = if app.form_is_dirty() {
                    "[ Apply Filters * ]"
                } else {
                    "[ Apply Filters ]"
                };
                line(f, &mut y, Line::from(""));
                line(f, &mut y, Line::from(Span::styled(label, style)));
            }
        }
    }

    if focused {
        line(
            f,
            &mut y,
            Line::from(Span::styled(
                "[j/k]move [Space]toggle [h/l]adjust [[/]]handle [a]pply",
                theme::muted(),
            )),
        );
    }
}
