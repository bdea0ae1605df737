//! Configuration management for the passkeeper application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables and command-line overrides, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `PASSKEEPER_DIR`: Path to the store directory (defaults to ~/.passkeeper)
//! - `HOME`: Used for expanding the default store directory path

use crate::constants::{DEFAULT_STORE_SUBDIR, ENV_VAR_HOME, ENV_VAR_PASSKEEPER_DIR};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the passkeeper application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use passkeeper::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     directory: PathBuf::from("/path/to/store"),
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use passkeeper::Config;
/// use std::env;
///
/// env::set_var("PASSKEEPER_DIR", "/custom/store/path");
///
/// let config = Config::load().expect("Failed to load configuration");
/// assert_eq!(config.directory.to_str(), Some("/custom/store/path"));
/// ```
#[derive(Clone)]
pub struct Config {
    /// Root directory of the store.
    ///
    /// Loaded from the command-line override, then `PASSKEEPER_DIR`, with a
    /// fallback to ~/.passkeeper.
    pub directory: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("directory", &"[REDACTED_PATH]")
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the directory path expansion fails or
    /// expands to an empty path.
    pub fn load() -> AppResult<Self> {
        Self::load_with_override(None)
    }

    /// Loads configuration, letting `directory` (typically from `--directory`)
    /// take precedence over the environment.
    ///
    /// The chosen path is expanded with `shellexpand`, so `~` and `$VARS` work
    /// in both sources.
    pub fn load_with_override(directory: Option<&str>) -> AppResult<Self> {
        let raw = match directory {
            Some(dir) => dir.to_string(),
            None => env::var(ENV_VAR_PASSKEEPER_DIR).unwrap_or_else(|_| {
                let home = env::var(ENV_VAR_HOME).unwrap_or_default();
                format!("{}/{}", home, DEFAULT_STORE_SUBDIR)
            }),
        };

        let expanded_path = shellexpand::full(&raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let directory = PathBuf::from(expanded_path.into_owned());

        if directory.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Store directory path is empty".to_string(),
            ));
        }

        Ok(Config { directory })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the directory is empty or relative.
    ///
    /// # Examples
    ///
    /// ```
    /// use passkeeper::Config;
    /// use std::path::PathBuf;
    ///
    /// let invalid_config = Config {
    ///     directory: PathBuf::from("relative/store"),
    /// };
    /// assert!(invalid_config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Store directory path is empty".to_string(),
            ));
        }

        if !self.directory.is_absolute() {
            return Err(AppError::Config(
                "Store directory must be an absolute path".to_string(),
            ));
        }

        Ok(())
    }
}
