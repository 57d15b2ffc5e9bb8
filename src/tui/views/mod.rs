//! TUI Views module
//!
//! The dashboard and status bar, with dialogs drawn on top.

pub mod dashboard;
pub mod status_bar;

use ratatui::Frame;

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    dashboard::render_header(frame, app, layout.header);
    dashboard::render_cards(frame, app, &layout);
    dashboard::render_progress(frame, &app.dashboard.summary(), layout.progress);
    dashboard::render_expenses(frame, app, layout.list);

    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &App) {
    match app.active_dialog {
        ActiveDialog::Help => dialogs::help::render(frame),
        ActiveDialog::EditGoal => dialogs::goal::render(frame, app),
        ActiveDialog::AddExpense => dialogs::expense::render(frame, app),
        ActiveDialog::Viewer => dialogs::viewer::render(frame, app),
        ActiveDialog::None => {}
    }
}
