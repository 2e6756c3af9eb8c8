//! Unified path management for the client's files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "crm-admin";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// The platform configuration directory could not be determined.
    #[error("Cannot find the configuration directory")]
    ConfigDirNotFound,
}

/// Path management for the client.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/crm-admin/         # Config directory (dirs::config_dir)
/// ├── config.toml              # Client configuration
/// ├── session.toml             # Persisted session (mode 600)
/// └── logs/                    # Daily-rolling logs
///     └── crm-admin.log.YYYY-MM-DD
/// ```
///
/// A base directory can be supplied to relocate everything (tests, `--config-dir`).
#[derive(Debug, Clone)]
pub struct CrmPaths {
    root: PathBuf,
}

impl CrmPaths {
    /// Resolves paths under the platform configuration directory.
    pub fn from_platform() -> Result<Self, PathError> {
        let base = dirs::config_dir().ok_or(PathError::ConfigDirNotFound)?;
        Ok(Self {
            root: base.join(APP_DIR),
        })
    }

    /// Resolves paths under `base` instead of the platform directory.
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        Self {
            root: base.as_ref().to_path_buf(),
        }
    }

    /// Uses `base` when given, the platform directory otherwise.
    pub fn resolve(base: Option<&Path>) -> Result<Self, PathError> {
        match base {
            Some(base) => Ok(Self::with_base(base)),
            None => Self::from_platform(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// The persisted session file.
    ///
    /// # Security Note
    ///
    /// The file holds a bearer token; it is written with permissions 600 on Unix.
    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_base() {
        let paths = CrmPaths::with_base("/tmp/crm-test");
        assert_eq!(paths.config_dir(), Path::new("/tmp/crm-test"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/crm-test/config.toml"));
        assert_eq!(paths.session_file(), PathBuf::from("/tmp/crm-test/session.toml"));
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/crm-test/logs"));
    }

    #[test]
    fn test_resolve_prefers_override() {
        let paths = CrmPaths::resolve(Some(Path::new("/srv/crm"))).unwrap();
        assert_eq!(paths.session_file(), PathBuf::from("/srv/crm/session.toml"));
    }

    #[test]
    fn test_platform_paths_end_with_app_dir() {
        if let Ok(paths) = CrmPaths::from_platform() {
            assert!(paths.config_dir().ends_with(APP_DIR));
        }
    }
}
