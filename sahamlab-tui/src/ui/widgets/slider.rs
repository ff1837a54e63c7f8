//! Two-handle range slider widget.
//!
//! Two rows tall: the label with the selected range, then the track.
//!
//! ```text
//! Sharpe Ratio                0.30 – 1.00
//! 0.00 ───────●━━━━━━━━━━━━━━━━━━━━● 1.00
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use sahamlab_core::{Bounds, Metric, SliderControl};

use crate::app::Handle;
use crate::theme;

pub struct RangeSlider {
    label: &'static str,
    control: SliderControl,
    bounds: Bounds,
    focused: bool,
    handle: Handle,
}

impl RangeSlider {
    pub fn new(metric: Metric, bounds: Bounds) -> Self {
        Self {
            label: metric.column_name(),
            control: metric.control(),
            bounds,
            focused: false,
            handle: Handle::Low,
        }
    }

    /// Highlight the slider and its active handle.
    pub fn focused(mut self, focused: bool, handle: Handle) -> Self {
        self.focused = focused;
        self.handle = handle;
        self
    }
}

/// Cell positions of the two handles on a track `width` cells wide.
pub fn handle_positions(control: &SliderControl, bounds: Bounds, width: usize) -> (usize, usize) {
    if width == 0 {
        return (0, 0);
    }
    let last = (width - 1) as f64;
    let pos = |v: f64| (control.fraction(v) * last).round() as usize;
    let (lo, hi) = (pos(bounds.low), pos(bounds.high));
    (lo.min(hi), hi.max(lo))
}

impl Widget for RangeSlider {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 8 {
            return;
        }
        let c = &self.control;
        let label_style = if self.focused { theme::accent_bold() } else { theme::text() };
        let track_style = if self.focused { theme::accent() } else { theme::muted() };
        let handle_style = |h: Handle| {
            if self.focused && self.handle == h {
                theme::accent_bold().add_modifier(Modifier::REVERSED)
            } else {
                track_style.add_modifier(Modifier::BOLD)
            }
        };

        // Row 1: label and selected range.
        let range = format!("{} – {}", c.format(self.bounds.low), c.format(self.bounds.high));
        let range_style = if self.bounds.is_satisfiable() { label_style } else { theme::warning() };
        let pad = (area.width as usize)
            .saturating_sub(self.label.chars().count() + range.chars().count());
        let header = Line::from(vec![
            Span::styled(self.label, label_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(range, range_style),
        ]);
        buf.set_line(area.x, area.y, &header, area.width);

        if area.height < 2 {
            return;
        }

        // Row 2: min label, track, max label.
        let min_label = c.format(c.min);
        let max_label = c.format(c.max);
        let track_width = (area.width as usize)
            .saturating_sub(min_label.chars().count() + max_label.chars().count() + 2);
        let (lo, hi) = handle_positions(c, self.bounds, track_width);

        let mut spans = vec![Span::styled(format!("{min_label} "), theme::muted())];
        for i in 0..track_width {
            let span = if i == lo {
                Span::styled("●", handle_style(Handle::Low))
            } else if i == hi {
                Span::styled("●", handle_style(Handle::High))
            } else if i > lo && i < hi {
                Span::styled("━", track_style)
            } else {
                Span::styled("─", Style::default().fg(ratatui::style::Color::DarkGray))
            };
            spans.push(span);
        }
        spans.push(Span::styled(format!(" {max_label}"), theme::muted()));
        buf.set_line(area.x, area.y + 1, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_sit_at_track_ends_for_full_range() {
        let c = Metric::Return.control();
        assert_eq!(handle_positions(&c, Bounds::new(0.0, 200.0), 21), (0, 20));
    }

    #[test]
    fn handles_scale_with_fraction() {
        let c = Metric::Sharpe.control();
        assert_eq!(handle_positions(&c, Bounds::new(0.3, 1.0), 11), (3, 10));
        let c = Metric::MaxDrawdown.control();
        assert_eq!(handle_positions(&c, Bounds::new(-35.0, 0.0), 15), (7, 14));
    }

    #[test]
    fn inverted_bounds_never_cross_on_screen() {
        let c = Metric::WinRate.control();
        let (lo, hi) = handle_positions(&c, Bounds::new(80.0, 10.0), 10);
        assert!(lo <= hi);
    }

    #[test]
    fn renders_label_range_and_track() {
        let area = Rect::new(0, 0, 30, 2);
        let mut buf = Buffer::empty(area);
        RangeSlider::new(Metric::Sharpe, Bounds::new(0.3, 1.0))
            .focused(true, Handle::High)
            .render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).starts_with("Sharpe Ratio"));
        assert!(row(0).trim_end().ends_with("0.30 – 1.00"));
        assert!(row(1).starts_with("0.00 "));
        assert!(row(1).ends_with(" 1.00"));
        assert_eq!(row(1).matches('●').count(), 2);
    }
}
