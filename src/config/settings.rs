//! User settings for FinWise
//!
//! Backend connection details and display preferences, persisted as JSON.

use serde::{Deserialize, Serialize};

use super::paths::FinwisePaths;
use crate::error::FinwiseError;
use crate::models::{Money, DEFAULT_SAVINGS_GOAL};

/// User settings for FinWise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backend base URL (overridden by `FINWISE_SUPABASE_URL`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,

    /// Public (anon) API key (overridden by `FINWISE_SUPABASE_ANON_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Storage bucket receipts are uploaded to
    #[serde(default = "default_bills_bucket")]
    pub bills_bucket: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Goal written into new profiles at sign-up
    #[serde(default = "default_savings_goal")]
    pub default_savings_goal: Money,

    /// Currency symbol used in output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_bills_bucket() -> String {
    "bills".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_savings_goal() -> Money {
    DEFAULT_SAVINGS_GOAL
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend_url: None,
            anon_key: None,
            bills_bucket: default_bills_bucket(),
            request_timeout_secs: default_request_timeout_secs(),
            default_savings_goal: default_savings_goal(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FinwisePaths) -> Result<Self, FinwiseError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FinwiseError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinwiseError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinwisePaths) -> Result<(), FinwiseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FinwiseError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinwiseError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
