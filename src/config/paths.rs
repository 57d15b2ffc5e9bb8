//! Path management for FinWise
//!
//! ## Path Resolution Order
//!
//! 1. `FINWISE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`$XDG_CONFIG_HOME/finwise`,
//!    `~/.config/finwise`, `%APPDATA%\finwise`, ...)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::FinwiseError;

/// Manages all paths used by FinWise
#[derive(Debug, Clone)]
pub struct FinwisePaths {
    /// Base directory for all FinWise data
    base_dir: PathBuf,
}

impl FinwisePaths {
    /// Create a new FinwisePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FinwiseError> {
        let base_dir = match std::env::var("FINWISE_DATA_DIR") {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create FinwisePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (holds the persisted session)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the persisted session
    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), FinwiseError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FinwiseError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FinwiseError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, FinwiseError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| FinwiseError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("finwise"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinwisePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.session_file(),
            temp_dir.path().join("data").join("session.json")
        );
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinwisePaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }
}
