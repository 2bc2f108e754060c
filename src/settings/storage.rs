//! Whole-file persistence for [`GeneralAppSettings`].

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::GeneralAppSettings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Reads and writes the settings file at a fixed path.
#[derive(Debug, Clone)]
pub struct GeneralAppSettingsStorage {
    path: PathBuf,
}

impl GeneralAppSettingsStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings. A missing file yields the defaults.
    pub fn load(&self) -> Result<GeneralAppSettings, SettingsError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Ok(GeneralAppSettings::default())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Replace the file with `settings`.
    pub fn save(&self, settings: &GeneralAppSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(settings)?;
        std::fs::write(&self.path, bytes)?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Delete the file. Missing is fine.
    pub fn remove(&self) -> Result<(), SettingsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
