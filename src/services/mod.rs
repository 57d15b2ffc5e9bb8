//! Service layer for FinWise
//!
//! Business logic on top of the backend: aggregation, goal editing, the
//! expense creation flow and receipt viewing. Every operation takes the
//! [`AppContext`](crate::session::AppContext) it acts for.

pub mod dashboard;
pub mod expense;
pub mod expense_form;
pub mod goal;
pub mod summary;
pub mod viewer;

pub use dashboard::Dashboard;
pub use expense::ExpenseService;
pub use expense_form::{BillImage, CreationState, ExpenseCreation, ExpenseDraft};
pub use goal::{GoalEditor, GoalSubmit};
pub use summary::{category_breakdown, BudgetStatus, BudgetSummary, CategoryTotal};
pub use viewer::ImageViewer;
