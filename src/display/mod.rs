//! Display formatting for terminal output
//!
//! Plain-text renderings of expenses, budget summaries and the signed-in
//! account, using the currency symbol and date format from settings.

pub mod expense;
pub mod summary;

pub use expense::{format_expense_details, format_expense_list, format_expense_row};
pub use summary::{format_account, format_breakdown, format_summary, progress_bar};
