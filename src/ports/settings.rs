use std::path::PathBuf;

use crate::domain::{AppSettings, DomainError};

/// Persistence port for application settings.
pub trait SettingsStore: Send + Sync {
    /// Load settings, creating defaults when no file exists yet.
    fn load(&self) -> Result<AppSettings, DomainError>;

    /// Persist settings.
    fn save(&self, settings: &AppSettings) -> Result<(), DomainError>;

    /// Path of the settings file.
    fn settings_path(&self) -> PathBuf;

    /// Application data directory.
    fn data_dir(&self) -> PathBuf;

    /// Log directory.
    fn logs_dir(&self) -> PathBuf;
}
