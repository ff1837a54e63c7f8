//! Neon-on-charcoal theme tokens for the SahamLab dashboard.
//!
//! # Color Palette
//! - **Accent**: electric cyan (focus, headers, active handle)
//! - **Positive**: neon green (gains, Sharpe above the benchmark)
//! - **Negative**: hot pink (losses, drawdowns)
//! - **Warning**: neon orange (status warnings, unsatisfiable filters)
//! - **Neutral**: cool purple (selection background, secondary info)
//! - **Muted**: steel blue (hints, inactive widgets)

use ratatui::style::{Color, Modifier, Style};

use sahamlab_core::report::BENCHMARK_SHARPE;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::neon()
    }
}

impl Theme {
    pub const fn neon() -> Self {
        Self {
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Green for gains, pink for losses. NaN reads as secondary text.
    pub fn pnl_color(&self, value: f64) -> Color {
        if value.is_nan() {
            self.text_secondary
        } else if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    /// Sharpe colored against the IDX Composite benchmark.
    pub fn sharpe_color(&self, sharpe: f64) -> Color {
        match sharpe {
            s if s >= 0.5 => self.positive,
            s if s > BENCHMARK_SHARPE => self.accent,
            s if s >= 0.0 => self.muted,
            s if s < 0.0 => self.negative,
            _ => self.text_secondary,
        }
    }

    /// Win rate in percent.
    pub fn win_rate_color(&self, win_rate_pct: f64) -> Color {
        match win_rate_pct {
            w if w >= 70.0 => self.positive,
            w if w >= 50.0 => self.accent,
            w if w >= 40.0 => self.neutral,
            _ => self.warning,
        }
    }
}

const THEME: Theme = Theme::neon();

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn neutral() -> Style {
    Style::default().fg(THEME.neutral)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

/// Highlighted table row or form row under the cursor.
pub fn selected() -> Style {
    Style::default()
        .bg(THEME.neutral)
        .fg(THEME.text_primary)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn pnl_style(value: f64) -> Style {
    Style::default().fg(THEME.pnl_color(value))
}

pub fn sharpe_style(sharpe: f64) -> Style {
    Style::default().fg(THEME.sharpe_color(sharpe))
}

pub fn win_rate_style(win_rate_pct: f64) -> Style {
    Style::default().fg(THEME.win_rate_color(win_rate_pct))
}
