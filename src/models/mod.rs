//! Core data models for FinWise
//!
//! Records owned by the backend (users, profiles, expenses) and the value
//! types they are built from.

pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod profile;
pub mod user;

pub use category::Category;
pub use expense::{Expense, NewExpense, MAX_BILL_IMAGES};
pub use ids::{ExpenseId, UserId};
pub use money::Money;
pub use profile::{Profile, DEFAULT_SAVINGS_GOAL};
pub use user::{Session, User, UserMetadata};
