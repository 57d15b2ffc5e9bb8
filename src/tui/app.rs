//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.

use crate::config::Settings;
use crate::models::Expense;
use crate::services::{Dashboard, ExpenseService, GoalEditor, GoalSubmit, ImageViewer};
use crate::session::AppContext;

use super::dialogs::expense::ExpenseFormState;

/// Ticks between checks for sign-in changes made by another process
const SESSION_SYNC_TICKS: u32 = 20;

/// Currently active dialog (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    EditGoal,
    AddExpense,
    Viewer,
}

/// Main application state
pub struct App<'a> {
    /// Session the TUI acts for
    pub ctx: &'a AppContext,

    /// Application settings
    pub settings: &'a Settings,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Currently active dialog
    pub active_dialog: ActiveDialog,

    /// Expenses and profile as last loaded
    pub dashboard: Dashboard,

    /// Selected expense index in the list
    pub selected_index: usize,

    pub goal_editor: GoalEditor,

    pub expense_form: ExpenseFormState,

    pub viewer: ImageViewer,

    /// Status message to display
    pub status_message: Option<String>,

    ticks: u32,
}

impl<'a> App<'a> {
    /// Create a new App instance
    pub fn new(ctx: &'a AppContext, settings: &'a Settings) -> Self {
        Self {
            ctx,
            settings,
            should_quit: false,
            active_dialog: ActiveDialog::default(),
            dashboard: Dashboard::new(),
            selected_index: 0,
            goal_editor: GoalEditor::new(),
            expense_form: ExpenseFormState::new(),
            viewer: ImageViewer::default(),
            status_message: None,
            ticks: 0,
        }
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Re-fetch expenses and profile
    pub fn reload(&mut self) {
        self.dashboard.load(self.ctx);
        let count = self.dashboard.expenses().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Periodic housekeeping
    pub fn on_tick(&mut self) {
        self.viewer.finish_loading();

        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % SESSION_SYNC_TICKS != 0 {
            return;
        }

        if let Err(err) = self.ctx.sync_session() {
            tracing::warn!(error = %err, "session sync failed");
        }
        if let Err(err) = self.ctx.ensure_fresh_session() {
            tracing::warn!(error = %err, "session refresh failed");
        }
        if !self.ctx.is_signed_in() {
            tracing::info!("signed out elsewhere, leaving TUI");
            self.quit();
        }
    }

    /// Open a dialog
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        match dialog {
            ActiveDialog::EditGoal => {
                self.goal_editor.open(self.dashboard.profile());
            }
            ActiveDialog::AddExpense => {
                self.expense_form = ExpenseFormState::new();
            }
            ActiveDialog::Viewer => {
                let Some(expense) = self.selected_expense() else {
                    return;
                };
                if !expense.has_images() {
                    self.set_status("No receipts attached to this expense");
                    return;
                }
                self.viewer = ImageViewer::new(expense.bill_images.clone());
            }
            ActiveDialog::Help | ActiveDialog::None => {}
        }
        self.active_dialog = dialog;
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        match self.active_dialog {
            ActiveDialog::EditGoal => self.goal_editor.cancel(),
            ActiveDialog::Viewer => self.viewer.close(),
            _ => {}
        }
        self.active_dialog = ActiveDialog::None;
    }

    /// Check if a dialog is active
    pub fn has_dialog(&self) -> bool {
        !matches!(self.active_dialog, ActiveDialog::None)
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.dashboard.expenses().get(self.selected_index)
    }

    /// Move selection up in the expense list
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Move selection down in the expense list
    pub fn move_down(&mut self) {
        let max = self.dashboard.expenses().len();
        if self.selected_index < max.saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    pub fn move_to_top(&mut self) {
        self.selected_index = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.selected_index = self.dashboard.expenses().len().saturating_sub(1);
    }

    /// Submit the goal editor
    pub fn submit_goal(&mut self) {
        match self.goal_editor.submit(self.ctx, &mut self.dashboard) {
            GoalSubmit::Updated(goal) => {
                self.active_dialog = ActiveDialog::None;
                self.set_status(format!("Goal set to {}", self.settings.format_money(goal)));
            }
            GoalSubmit::Skipped => {}
            GoalSubmit::Invalid(message) => self.set_status(message),
            GoalSubmit::Failed(message) => {
                self.set_status(format!("Error updating goal: {}", message))
            }
        }
    }

    /// Submit the add-expense form; on success return to the dashboard
    pub fn submit_expense(&mut self) {
        let draft = self.expense_form.draft.clone();
        match ExpenseService::new(self.ctx).create(draft) {
            Ok(expense) => {
                self.active_dialog = ActiveDialog::None;
                self.expense_form = ExpenseFormState::new();
                self.reload();
                self.selected_index = 0;
                self.set_status(format!(
                    "Added {} ({})",
                    expense.title(),
                    self.settings.format_money(expense.amount)
                ));
            }
            // The form keeps what was typed so the user can retry
            Err(err) => self.expense_form.set_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::models::{Category, Money};
    use std::sync::Arc;

    fn context() -> (Arc<MemoryBackend>, AppContext) {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend.clone());
        ctx.sign_up("asha@example.com", "secret123", "asha").unwrap();
        (backend, ctx)
    }

    #[test]
    fn test_goal_dialog_round_trip() {
        let (backend, ctx) = context();
        let settings = Settings::default();
        let mut app = App::new(&ctx, &settings);
        app.reload();

        app.open_dialog(ActiveDialog::EditGoal);
        assert_eq!(app.goal_editor.input(), "5000");

        app.goal_editor.set_input("7500");
        app.submit_goal();

        assert!(!app.has_dialog());
        let user = ctx.require_user().unwrap();
        assert_eq!(
            backend.profile(user.id).unwrap().savings_goal,
            Money::from_units(7500)
        );
    }

    #[test]
    fn test_add_expense_returns_to_dashboard() {
        let (_, ctx) = context();
        let settings = Settings::default();
        let mut app = App::new(&ctx, &settings);
        app.reload();

        app.open_dialog(ActiveDialog::AddExpense);
        app.expense_form.draft.amount = "320".into();
        app.expense_form.draft.category = Some(Category::Entertainment);
        app.submit_expense();

        assert!(!app.has_dialog());
        assert_eq!(app.dashboard.expenses().len(), 1);
        assert_eq!(app.dashboard.summary().total, Money::from_units(320));
    }

    #[test]
    fn test_failed_expense_keeps_form() {
        let (_, ctx) = context();
        let settings = Settings::default();
        let mut app = App::new(&ctx, &settings);

        app.open_dialog(ActiveDialog::AddExpense);
        app.expense_form.draft.amount = "abc".into();
        app.submit_expense();

        assert_eq!(app.active_dialog, ActiveDialog::AddExpense);
        assert_eq!(app.expense_form.draft.amount, "abc");
        assert!(app.expense_form.error_message.is_some());
    }

    #[test]
    fn test_viewer_needs_images() {
        let (_, ctx) = context();
        let settings = Settings::default();
        let mut app = App::new(&ctx, &settings);
        app.open_dialog(ActiveDialog::Viewer);
        assert!(!app.has_dialog());
    }
}
