//! Savings goal editor
//!
//! Edit-in-place state for the goal card: open with the current goal filled
//! in, type a new value, submit. A successful write is applied to the
//! dashboard directly; there is no re-fetch.

use crate::models::{Money, Profile};
use crate::session::AppContext;

use super::dashboard::Dashboard;

/// Result of a submit
#[derive(Debug, Clone, PartialEq)]
pub enum GoalSubmit {
    /// Signed out or empty input; nothing happened
    Skipped,
    /// Input was not a usable amount; the editor stays open
    Invalid(String),
    Updated(Money),
    /// The backend rejected the write; the editor stays open
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct GoalEditor {
    editing: bool,
    input: String,
    updating: bool,
}

impl GoalEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing, prefilled with the profile's goal
    pub fn open(&mut self, profile: Option<&Profile>) {
        self.editing = true;
        self.input = profile
            .map(|p| p.savings_goal.to_input_string())
            .unwrap_or_default();
    }

    pub fn cancel(&mut self) {
        self.editing = false;
        self.input.clear();
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn push_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Write the typed goal to the user's profile
    pub fn submit(&mut self, ctx: &AppContext, dashboard: &mut Dashboard) -> GoalSubmit {
        let Some(user) = ctx.user() else {
            return GoalSubmit::Skipped;
        };
        if self.input.trim().is_empty() {
            return GoalSubmit::Skipped;
        }

        let goal = match Money::parse(&self.input) {
            Ok(goal) if !goal.is_negative() => goal,
            Ok(_) => return GoalSubmit::Invalid("Goal cannot be negative".into()),
            Err(e) => return GoalSubmit::Invalid(e.to_string()),
        };

        self.updating = true;
        let result = ctx.backend().update_savings_goal(user.id, goal);
        self.updating = false;

        match result {
            Ok(()) => {
                tracing::info!(user_id = %user.id, goal = %goal, "savings goal updated");
                dashboard.set_goal_locally(goal);
                self.editing = false;
                self.input.clear();
                GoalSubmit::Updated(goal)
            }
            Err(err) => {
                tracing::error!(error = %err, "Error updating goal");
                GoalSubmit::Failed(err.to_string())
            }
        }
    }
}
