//! Dialog modules for the TUI

pub mod expense;
pub mod goal;
pub mod help;
pub mod viewer;
