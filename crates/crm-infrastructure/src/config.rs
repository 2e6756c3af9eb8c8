//! Client configuration.
//!
//! Sources, highest priority first: environment (`CRM_API_BASE_URL`,
//! `CRM_REQUEST_TIMEOUT_MS`), `config.toml`, built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::paths::CrmPaths;
use crate::storage::AtomicTomlFile;
use crm_core::error::{CrmError, Result};

pub const ENV_API_BASE_URL: &str = "CRM_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "CRM_REQUEST_TIMEOUT_MS";

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_base_url: String,
    /// Bound on every authentication and repository call.
    pub request_timeout_ms: u64,
    /// Overrides the session file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            session_file: None,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The configured session file, or the default one under `paths`.
    pub fn session_file(&self, paths: &CrmPaths) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| paths.session_file())
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            debug!(source = ENV_API_BASE_URL, "Overriding api_base_url");
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            self.request_timeout_ms = raw.trim().parse().map_err(|_| {
                CrmError::config(format!("{ENV_REQUEST_TIMEOUT_MS} must be an integer, got '{raw}'"))
            })?;
            debug!(source = ENV_REQUEST_TIMEOUT_MS, "Overriding request_timeout_ms");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CrmError::config(format!(
                "api_base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(CrmError::config("request_timeout_ms must be positive"));
        }
        Ok(())
    }
}

/// Loads and saves `config.toml`.
pub struct ConfigLoader {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigLoader {
    pub fn new(paths: &CrmPaths) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.config_file()),
        }
    }

    /// Loads the configuration with process environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Loads the configuration with overrides read through `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match self.file.load()? {
            Some(config) => config,
            None => {
                debug!(path = %self.file.path().display(), "No config file, using defaults");
                ClientConfig::default()
            }
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        config.validate()?;
        Ok(self.file.save(config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::new(&CrmPaths::with_base(temp_dir.path()));

        let config = loader.load_with(no_env).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_file_values_fill_missing_keys_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CrmPaths::with_base(temp_dir.path());
        std::fs::write(
            paths.config_file(),
            "api_base_url = \"https://crm.example.com/api\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new(&paths).load_with(no_env).unwrap();
        assert_eq!(config.api_base_url, "https://crm.example.com/api");
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.session_file(&paths), paths.session_file());
    }

    #[test]
    fn test_environment_wins_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CrmPaths::with_base(temp_dir.path());
        let loader = ConfigLoader::new(&paths);
        loader
            .save(&ClientConfig {
                api_base_url: "https://file.example.com".into(),
                request_timeout_ms: 500,
                session_file: Some(temp_dir.path().join("elsewhere.toml")),
            })
            .unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_BASE_URL, "https://env.example.com"),
            (ENV_REQUEST_TIMEOUT_MS, "2500"),
        ]);
        let config = loader
            .load_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_base_url, "https://env.example.com");
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(
            config.session_file(&paths),
            temp_dir.path().join("elsewhere.toml")
        );
    }

    #[test]
    fn test_invalid_timeout_override() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::new(&CrmPaths::with_base(temp_dir.path()));

        let err = loader
            .load_with(|key| (key == ENV_REQUEST_TIMEOUT_MS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ClientConfig {
            api_base_url: "ftp://example.com".into(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().is_config());

        let config = ClientConfig {
            request_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().is_config());
    }
}
