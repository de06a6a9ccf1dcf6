//! Path management for pocket-ledger
//!
//! ## Path Resolution Order
//!
//! 1. `POCKET_LEDGER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/pocket-ledger` or `~/.config/pocket-ledger`
//! 3. Windows: `%APPDATA%\pocket-ledger`

use std::path::{Path, PathBuf};

use crate::error::PocketError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "POCKET_LEDGER_DATA_DIR";

/// Manages all paths used by pocket-ledger
#[derive(Debug, Clone)]
pub struct PocketPaths {
    base_dir: PathBuf,
}

impl PocketPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PocketError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PocketPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Directory that relative report names are saved into
    pub fn reports_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    /// Resolve a report name: absolute paths and paths with a directory part
    /// are used as given, bare file names land in the reports directory
    pub fn report_file(&self, name: &str) -> PathBuf {
        let path = Path::new(name.trim());
        let bare = path
            .parent()
            .map_or(true, |parent| parent.as_os_str().is_empty());

        if path.is_absolute() || !bare {
            path.to_path_buf()
        } else {
            self.reports_dir().join(path)
        }
    }

    /// Ensure the base and reports directories exist
    pub fn ensure_directories(&self) -> Result<(), PocketError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PocketError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.reports_dir())
            .map_err(|e| PocketError::Io(format!("Failed to create reports directory: {}", e)))?;

        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PocketError> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("pocket-ledger"));
    }

    let home = std::env::var("HOME")
        .map_err(|_| PocketError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("pocket-ledger"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PocketError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PocketError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("pocket-ledger"))
}
