//! Settings file handling.
//!
//! Settings live in `qf.conf` inside the QFinance home directory. A missing
//! file is created with the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::Settings;
use crate::errors::{Error, Result};

pub const SETTINGS_FILE_NAME: &str = "qf.conf";
pub const HOME_ENV_VAR: &str = "QF_HOME";

/// Resolve the QFinance home directory.
///
/// `QF_HOME` wins. Otherwise `%LOCALAPPDATA%\libreoffice\qf` on Windows and
/// `$HOME/libreoffice/qf` elsewhere.
pub fn home_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV_VAR) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let base_var = if cfg!(windows) { "LOCALAPPDATA" } else { "HOME" };
    let base = std::env::var(base_var)
        .map_err(|_| Error::ConfigIO(format!("{} is not set", base_var)))?;
    Ok(PathBuf::from(base).join("libreoffice").join("qf"))
}

/// Reads and writes one settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `qf.conf` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings, writing a default file first when none exists.
    pub fn load_or_create(&self) -> Result<Settings> {
        if !self.path.exists() {
            info!("Creating default settings at {}", self.path.display());
            let settings = Settings::default();
            self.save(&settings)?;
            return Ok(settings);
        }
        self.load()
    }

    pub fn load(&self) -> Result<Settings> {
        debug!("Loading settings from {}", self.path.display());
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::InvalidConfigValue(format!("{}: {}", self.path.display(), e)))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::ConfigIO(format!("{}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::Unexpected(format!("Failed to serialize settings: {}", e)))?;
        fs::write(&self.path, contents)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", self.path.display(), e)))?;
        restrict_permissions(&self.path)
    }
}

// The file may hold an API token.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
