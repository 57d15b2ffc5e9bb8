//! Event handler for the TUI
//!
//! Routes keyboard events to the dashboard or the open dialog.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{ActiveDialog, App};
use super::dialogs::expense::ExpenseField;
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => {
            app.on_tick();
            Ok(())
        }
        Event::Resize(_, _) => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    // Windows terminals report releases too
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    match app.active_dialog {
        ActiveDialog::None => handle_dashboard_key(app, key),
        ActiveDialog::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.close_dialog();
            }
            Ok(())
        }
        ActiveDialog::EditGoal => handle_goal_key(app, key),
        ActiveDialog::AddExpense => handle_expense_key(app, key),
        ActiveDialog::Viewer => handle_viewer_key(app, key),
    }
}

/// Handle keys on the dashboard
fn handle_dashboard_key(app: &mut App, key: KeyEvent) -> Result<()> {
    app.clear_status();

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.move_to_bottom(),

        KeyCode::Char('r') => {
            app.reload();
            app.set_status("Reloaded");
        }
        KeyCode::Char('e') => app.open_dialog(ActiveDialog::EditGoal),
        KeyCode::Char('a') | KeyCode::Char('n') => app.open_dialog(ActiveDialog::AddExpense),
        KeyCode::Char('v') | KeyCode::Enter => app.open_dialog(ActiveDialog::Viewer),

        _ => {}
    }

    Ok(())
}

/// Handle keys in the goal editor
fn handle_goal_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.submit_goal(),
        KeyCode::Backspace => app.goal_editor.pop_char(),
        KeyCode::Char(c) => app.goal_editor.push_char(c),
        _ => {}
    }
    Ok(())
}

/// Handle keys in the add expense form
fn handle_expense_key(app: &mut App, key: KeyEvent) -> Result<()> {
    let on_category = app.expense_form.focused_field == ExpenseField::Category;
    let on_typed_image = app.expense_form.focused_field == ExpenseField::Image
        && !app.expense_form.image_path.trim().is_empty();

    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.submit_expense()
        }
        KeyCode::Tab | KeyCode::Down => app.expense_form.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.expense_form.prev_field(),
        KeyCode::Left if on_category => app.expense_form.cycle_category(false),
        KeyCode::Right if on_category => app.expense_form.cycle_category(true),
        KeyCode::Enter if on_typed_image => app.expense_form.stage_typed_image(),
        KeyCode::Enter => app.submit_expense(),
        KeyCode::Backspace => app.expense_form.backspace(),
        KeyCode::Char(c) => app.expense_form.insert_char(c),
        _ => {}
    }
    Ok(())
}

/// Handle keys in the receipt viewer
fn handle_viewer_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_dialog(),
        KeyCode::Char('l') | KeyCode::Right => app.viewer.next(),
        KeyCode::Char('h') | KeyCode::Left => app.viewer.previous(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.viewer.zoom_in(),
        KeyCode::Char('-') => app.viewer.zoom_out(),
        KeyCode::Char('f') => app.viewer.toggle_fullscreen(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.viewer.select(index);
        }
        _ => {}
    }
    Ok(())
}
