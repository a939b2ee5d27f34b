//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LAUNDRY_API_BASE_URL` - Base URL of the backend API
//!
//! ## Optional
//! - `LAUNDRY_STORAGE_PATH` - Session file for durable storage (default: laundry-session.json)
//! - `LAUNDRY_PROTECTED_GROUP` - Route-group segment of the protected area (default: (tabs))
//! - `LAUNDRY_ENTRY_ROUTE` - Entry screen path (default: /)
//! - `LAUNDRY_PROTECTED_ROOT` - Protected area root path (default: /(tabs))
//! - `LAUNDRY_REDIRECT_DELAY_MS` - Delay before a scheduled redirect fires (default: 16)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::navigation::RouteConfig;

const DEFAULT_STORAGE_PATH: &str = "laundry-session.json";
const DEFAULT_REDIRECT_DELAY_MS: &str = "16";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend API base URL
    pub api_base_url: Url,
    /// Where the file-backed session store keeps its data
    pub storage_path: PathBuf,
    /// Entry screen, protected root and protected group marker
    pub routes: RouteConfig,
    /// Delay before a scheduled redirect fires
    pub redirect_delay: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let api_base_url = Url::parse(&vars.required("LAUNDRY_API_BASE_URL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("LAUNDRY_API_BASE_URL".to_string(), e.to_string())
        })?;
        let storage_path =
            PathBuf::from(vars.or_default("LAUNDRY_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        let defaults = RouteConfig::default();
        let routes = RouteConfig {
            entry: vars.or_default("LAUNDRY_ENTRY_ROUTE", &defaults.entry),
            protected_root: vars.or_default("LAUNDRY_PROTECTED_ROOT", &defaults.protected_root),
            protected_group: vars.or_default("LAUNDRY_PROTECTED_GROUP", &defaults.protected_group),
        };

        let redirect_delay_ms = vars
            .or_default("LAUNDRY_REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY_MS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LAUNDRY_REDIRECT_DELAY_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            storage_path,
            routes,
            redirect_delay: Duration::from_millis(redirect_delay_ms),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable; blank counts as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("LAUNDRY_API_BASE_URL", "https://api.example.com")]).unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://api.example.com/");
        assert_eq!(config.storage_path, PathBuf::from("laundry-session.json"));
        assert_eq!(config.routes, RouteConfig::default());
        assert_eq!(config.redirect_delay, Duration::from_millis(16));
    }

    #[test]
    fn test_missing_base_url() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingEnvVar(_))));
        assert!(matches!(
            load(&[("LAUNDRY_API_BASE_URL", "  ")]),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("LAUNDRY_API_BASE_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[
                ("LAUNDRY_API_BASE_URL", "http://localhost:5000"),
                ("LAUNDRY_REDIRECT_DELAY_MS", "soon"),
            ]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("LAUNDRY_API_BASE_URL", "http://localhost:5000"),
            ("LAUNDRY_STORAGE_PATH", "/tmp/s.json"),
            ("LAUNDRY_PROTECTED_GROUP", "(app)"),
            ("LAUNDRY_PROTECTED_ROOT", "/(app)/home"),
            ("LAUNDRY_ENTRY_ROUTE", "/welcome"),
            ("LAUNDRY_REDIRECT_DELAY_MS", "0"),
        ])
        .unwrap();
        assert_eq!(config.routes.protected_group, "(app)");
        assert_eq!(config.routes.protected_root, "/(app)/home");
        assert_eq!(config.routes.entry, "/welcome");
        assert_eq!(config.redirect_delay, Duration::ZERO);
    }
}
