//! Backend connection configuration.
//!
//! Environment variables win over the settings file:
//! - `FINWISE_SUPABASE_URL`: backend base URL (required)
//! - `FINWISE_SUPABASE_ANON_KEY`: public API key (required)
//! - `FINWISE_BILLS_BUCKET`: storage bucket for receipts
//! - `FINWISE_REQUEST_TIMEOUT_SECS`: per-request timeout

use super::settings::Settings;
use crate::error::FinwiseError;

pub const URL_ENV: &str = "FINWISE_SUPABASE_URL";
pub const ANON_KEY_ENV: &str = "FINWISE_SUPABASE_ANON_KEY";
pub const BUCKET_ENV: &str = "FINWISE_BILLS_BUCKET";
pub const TIMEOUT_ENV: &str = "FINWISE_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL without trailing slash
    pub url: String,
    pub anon_key: String,
    pub bills_bucket: String,
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Build the config from the process environment and settings
    pub fn resolve(settings: &Settings) -> Result<Self, FinwiseError> {
        Self::resolve_with(settings, |key| std::env::var(key).ok())
    }

    /// Build the config with an explicit variable lookup
    pub fn resolve_with<F>(settings: &Settings, lookup: F) -> Result<Self, FinwiseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = non_empty(URL_ENV)
            .or_else(|| settings.backend_url.clone())
            .ok_or_else(|| {
                FinwiseError::Config(format!(
                    "backend URL not set; export {} or add backend_url to config.json",
                    URL_ENV
                ))
            })?;
        let url = validate_url(&url)?;

        let anon_key = non_empty(ANON_KEY_ENV)
            .or_else(|| settings.anon_key.clone())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                FinwiseError::Config(format!(
                    "anon key not set; export {} or add anon_key to config.json",
                    ANON_KEY_ENV
                ))
            })?;

        let bills_bucket = non_empty(BUCKET_ENV).unwrap_or_else(|| settings.bills_bucket.clone());

        let timeout_secs = non_empty(TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(settings.request_timeout_secs);

        Ok(Self {
            url,
            anon_key: anon_key.trim().to_string(),
            bills_bucket,
            timeout_secs,
        })
    }
}

fn validate_url(raw: &str) -> Result<String, FinwiseError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(FinwiseError::Config(format!(
            "backend URL must start with http:// or https:// (got '{}')",
            raw
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_settings() {
        let mut settings = Settings::default();
        settings.backend_url = Some("https://from-file.supabase.co".into());
        settings.anon_key = Some("file-key".into());

        let config = BackendConfig::resolve_with(
            &settings,
            env(&[(URL_ENV, "https://from-env.supabase.co/"), (TIMEOUT_ENV, "5")]),
        )
        .unwrap();

        assert_eq!(config.url, "https://from-env.supabase.co");
        assert_eq!(config.anon_key, "file-key");
        assert_eq!(config.bills_bucket, "bills");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let err = BackendConfig::resolve_with(&Settings::default(), env(&[(ANON_KEY_ENV, "k")]))
            .unwrap_err();
        assert!(matches!(err, FinwiseError::Config(msg) if msg.contains(URL_ENV)));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = BackendConfig::resolve_with(
            &Settings::default(),
            env(&[(URL_ENV, "https://x.supabase.co")]),
        )
        .unwrap_err();
        assert!(matches!(err, FinwiseError::Config(msg) if msg.contains(ANON_KEY_ENV)));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = BackendConfig::resolve_with(
            &Settings::default(),
            env(&[(URL_ENV, "x.supabase.co"), (ANON_KEY_ENV, "k")]),
        )
        .unwrap_err();
        assert!(matches!(err, FinwiseError::Config(_)));
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = BackendConfig::resolve_with(
            &Settings::default(),
            env(&[
                (URL_ENV, "http://localhost:54321"),
                (ANON_KEY_ENV, "k"),
                (TIMEOUT_ENV, "soon"),
            ]),
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 30);
    }
}
