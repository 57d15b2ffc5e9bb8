//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod auth;
pub mod expense;
pub mod goal;
pub mod summary;

pub use auth::{handle_auth_command, AuthCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use summary::handle_summary_command;
