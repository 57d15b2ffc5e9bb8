//! Configuration module for FinWise
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Backend connection details

pub mod backend;
pub mod paths;
pub mod settings;

pub use backend::BackendConfig;
pub use paths::FinwisePaths;
pub use settings::Settings;
