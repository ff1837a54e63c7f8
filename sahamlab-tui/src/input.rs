//! Keyboard input dispatch — overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Focus, FormRow, Handle, Overlay, Panel};

/// Rows moved by PageUp / PageDown in the results table.
const PAGE: isize = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Detail(_) => {
            handle_detail_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Backtest => handle_backtest_key(app, key),
        Panel::Report => handle_report_key(app, key),
        Panel::Help => {}
    }
}

fn handle_detail_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
            app.overlay = Overlay::None;
        }
        // Step through rows without closing the overlay.
        KeyCode::Char('j') | KeyCode::Down => {
            app.table.move_cursor(1);
            app.overlay = Overlay::Detail(app.table.cursor);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.table.move_cursor(-1);
            app.overlay = Overlay::Detail(app.table.cursor);
        }
        _ => {}
    }
}

fn handle_backtest_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('f') => {
            app.focus = match app.focus {
                Focus::Form => Focus::Table,
                Focus::Table => Focus::Form,
            };
            return;
        }
        KeyCode::Char('a') => {
            app.submit();
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Form => handle_form_key(app, key),
        Focus::Table => handle_table_key(app, key),
    }
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    let row = app.form.current_row();
    // Some terminals report 'H'/'L' without the SHIFT modifier.
    let coarse = key.modifiers.contains(KeyModifiers::SHIFT)
        || matches!(key.code, KeyCode::Char('H') | KeyCode::Char('L'));

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.form.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.form.move_cursor(-1),
        KeyCode::Char('[') => app.form.handle = Handle::Low,
        KeyCode::Char(']') => app.form.handle = Handle::High,
        KeyCode::Char('r') => {
            let preset = app.form.preset;
            app.form.select_preset(preset);
            app.set_status(format!("Sliders reset to {preset}"));
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('H') => match row {
            FormRow::Slider(metric) => app.form.nudge(metric, if coarse { -10 } else { -1 }),
            FormRow::Preset => app.form.select_preset(app.form.preset.prev()),
            _ => {}
        },
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('L') => match row {
            FormRow::Slider(metric) => app.form.nudge(metric, if coarse { 10 } else { 1 }),
            FormRow::Preset => app.form.select_preset(app.form.preset.next()),
            _ => {}
        },
        KeyCode::Home => {
            if let FormRow::Slider(metric) = row {
                app.form.handle = Handle::Low;
                app.form.jump_to_end(metric);
            }
        }
        KeyCode::End => {
            if let FormRow::Slider(metric) = row {
                app.form.handle = Handle::High;
                app.form.jump_to_end(metric);
            }
        }
        KeyCode::Char(' ') | KeyCode::Enter => match row {
            FormRow::Indicator(ind) => {
                app.form.toggle_indicator(ind);
            }
            FormRow::Slider(_) => {
                app.form.handle = match app.form.handle {
                    Handle::Low => Handle::High,
                    Handle::High => Handle::Low,
                };
            }
            FormRow::Preset | FormRow::Apply => app.submit(),
        },
        _ => {}
    }
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) {
    let table = &mut app.table;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => table.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => table.move_cursor(-1),
        KeyCode::PageDown => table.move_cursor(PAGE),
        KeyCode::PageUp => table.move_cursor(-PAGE),
        KeyCode::Char('g') | KeyCode::Home => table.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => table.cursor_to_end(),
        KeyCode::Char('s') => table.cycle_sort(true),
        KeyCode::Char('S') => table.cycle_sort(false),
        KeyCode::Char('d') => table.flip_direction(),
        KeyCode::Char('u') => table.clear_sort(),
        KeyCode::Enter => app.open_detail(),
        _ => {}
    }
}

fn handle_report_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.report_scroll = app.report_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.report_scroll = app.report_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => app.report_scroll = app.report_scroll.saturating_add(PAGE as u16),
        KeyCode::PageUp => app.report_scroll = app.report_scroll.saturating_sub(PAGE as u16),
        KeyCode::Char('g') | KeyCode::Home => app.report_scroll = 0,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::sample_store;
    use crate::app::FORM_ROWS;
    use sahamlab_core::{Column, Indicator, Metric, Preset, SortDirection};

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> AppState {
        AppState::new(sample_store(), Preset::NoFilter, false)
    }

    fn cursor_to(app: &mut AppState, row: FormRow) {
        app.form.cursor = FORM_ROWS.iter().position(|r| *r == row).unwrap();
    }

    #[test]
    fn welcome_dismissed_by_any_key() {
        let mut app = AppState::new(sample_store(), Preset::NoFilter, true);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
    }

    #[test]
    fn number_keys_switch_tabs_and_q_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_panel, Panel::Report);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_panel, Panel::Help);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.active_panel, Panel::Backtest);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_panel, Panel::Help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn space_toggles_checkbox_under_cursor() {
        let mut app = app();
        cursor_to(&mut app, FormRow::Indicator(Indicator::Macd));
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.form.indicators.contains(Indicator::Macd));
        assert_eq!(app.form.indicators.len(), 4);
    }

    #[test]
    fn preset_row_cycles_and_repopulates() {
        let mut app = app();
        cursor_to(&mut app, FormRow::Preset);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.form.preset, Preset::ShortTerm);
        assert_eq!(app.form.ranges, Preset::ShortTerm.ranges());
        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.form.preset, Preset::LongTerm);
    }

    #[test]
    fn slider_keys_move_selected_handle() {
        let mut app = app();
        cursor_to(&mut app, FormRow::Slider(Metric::WinRate));
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.form.ranges.get(Metric::WinRate).high, 89.0);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT));
        assert_eq!(app.form.ranges.get(Metric::WinRate).high, 90.0);

        press(&mut app, KeyCode::Char('['));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT));
        assert_eq!(app.form.ranges.get(Metric::WinRate).low, 10.0);
    }

    #[test]
    fn uppercase_h_l_step_coarse_without_shift_modifier() {
        let mut app = app();
        cursor_to(&mut app, FormRow::Slider(Metric::WinRate));
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('L'));
        assert_eq!(app.form.ranges.get(Metric::WinRate).low, 10.0);
        press(&mut app, KeyCode::Char('L'));
        assert_eq!(app.form.ranges.get(Metric::WinRate).low, 20.0);
        press(&mut app, KeyCode::Char('H'));
        assert_eq!(app.form.ranges.get(Metric::WinRate).low, 10.0);
    }

    #[test]
    fn apply_row_submits() {
        let mut app = app();
        app.form.select_preset(Preset::LongTerm);
        cursor_to(&mut app, FormRow::Apply);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.table.view.len(), 2);
        assert!(app.applied.is_some());
    }

    #[test]
    fn table_keys_sort_and_open_detail() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.focus, Focus::Table);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.table.sort, Some((Column::Sharpe, SortDirection::Descending)));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.table.sort, Some((Column::Sharpe, SortDirection::Ascending)));

        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.table.cursor, 3);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, Overlay::Detail(3));

        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.overlay, Overlay::Detail(2));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }
}
