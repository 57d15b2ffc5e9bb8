//! Who is signed in
//!
//! The [`AppContext`] is created unauthenticated, follows auth events from the
//! backend, and is passed explicitly to everything that needs the current user.

pub mod context;

pub use context::{AppContext, DEFAULT_BILLS_BUCKET};
