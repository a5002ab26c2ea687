use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output location settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Override for the output root. When unset, outputs land under the
    /// platform music directory in an `RVC` folder.
    pub dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Persisted application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl AppSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the output root all jobs write under.
    pub fn output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output.dir {
            return dir.clone();
        }
        dirs::audio_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Music")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("RVC")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_platform_default() {
        let mut settings = AppSettings::new();
        settings.output.dir = Some(PathBuf::from("/tmp/outputs"));
        assert_eq!(settings.output_dir(), PathBuf::from("/tmp/outputs"));
    }

    #[test]
    fn default_output_dir_ends_in_rvc() {
        let settings = AppSettings::new();
        assert!(settings.output_dir().ends_with("RVC"));
    }
}
