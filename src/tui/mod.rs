//! Terminal User Interface module
//!
//! The FinWise dashboard in the terminal: summary cards, goal progress, the
//! expense list, and dialogs for editing the goal, adding an expense and
//! viewing receipts.

pub mod app;
pub mod dialogs;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod views;

pub use terminal::run_tui;
