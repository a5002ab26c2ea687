use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{AppSettings, DomainError};
use crate::ports::SettingsStore;

/// TOML-based settings store with OS-specific paths.
pub struct TomlSettingsStore {
    data_dir: PathBuf,
}

impl TomlSettingsStore {
    /// Create a store under the OS application data directory.
    pub fn new() -> Result<Self, DomainError> {
        let data_dir = dirs::config_dir()
            .map(|p| p.join("VoxRoute"))
            .ok_or_else(|| {
                DomainError::Config("Could not find application data directory".to_string())
            })?;
        Self::at(data_dir)
    }

    /// Create a store rooted at an explicit directory.
    pub fn at(data_dir: PathBuf) -> Result<Self, DomainError> {
        fs::create_dir_all(&data_dir)?;
        info!(data_dir = ?data_dir, "SettingsStore initialized");
        Ok(Self { data_dir })
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<AppSettings, DomainError> {
        let path = self.settings_path();
        if path.exists() {
            debug!(path = ?path, "Loading settings");
            let content = fs::read_to_string(&path)?;
            let settings: AppSettings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            info!(path = ?path, "Settings file not found, creating default");
            let settings = AppSettings::new();
            self.save(&settings)?;
            Ok(settings)
        }
    }

    fn save(&self, settings: &AppSettings) -> Result<(), DomainError> {
        let path = self.settings_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(settings)?;
        fs::write(&path, content)?;
        info!(path = ?path, "Settings saved");
        Ok(())
    }

    fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::at(dir.path().to_path_buf()).unwrap();

        let mut settings = AppSettings::new();
        settings.output.dir = Some(PathBuf::from("/tmp/renders"));
        settings.logging.level = "debug".to_string();
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.output.dir, Some(PathBuf::from("/tmp/renders")));
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn missing_file_yields_defaults_and_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::at(dir.path().to_path_buf()).unwrap();

        let settings = store.load().unwrap();
        assert!(settings.output.dir.is_none());
        assert!(store.settings_path().exists());
    }
}
