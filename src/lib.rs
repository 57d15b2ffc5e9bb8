//! FinWise - track spending against a monthly savings goal
//!
//! This library provides the core of the FinWise terminal client. Accounts,
//! profiles, expenses and receipt images live in a hosted Supabase project;
//! the client signs in, records expenses with up to five receipt photos and
//! shows how much of the monthly goal has been spent.
//!
//! # Architecture
//!
//! - `config`: Paths, settings and backend connection details
//! - `error`: Custom error types
//! - `models`: Users, sessions, profiles, expenses and money
//! - `backend`: The backend seam, with Supabase and in-memory implementations
//! - `storage`: Local JSON persistence (the saved session)
//! - `session`: The signed-in context shared by CLI and TUI
//! - `services`: Dashboard aggregation, goal editing, expense creation, receipt viewer
//! - `cli` / `display` / `tui`: User-facing surfaces
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use finwise::backend::MemoryBackend;
//! use finwise::session::AppContext;
//!
//! let ctx = AppContext::new(Arc::new(MemoryBackend::new()));
//! ctx.sign_up("asha@example.com", "secret123", "asha")?;
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod tui;

pub use error::{FinwiseError, FinwiseResult};
