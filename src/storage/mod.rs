//! Local storage layer for FinWise
//!
//! All records live on the backend; the only local state is the persisted
//! session, written atomically as JSON.

pub mod file_io;
pub mod session;

pub use file_io::{read_json_optional, remove_if_exists, write_json_atomic};
pub use session::SessionStore;
