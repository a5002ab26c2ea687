use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::routing::{Backend, Mode};

/// Default local voice conversion / separation server.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";
/// Default local audio transform server.
pub const DEFAULT_STABILITY_SERVER: &str = "http://127.0.0.1:7860";

/// Snapshot of every parameter a job can carry.
///
/// Mutation happens only through `Command`s applied by the controller; the
/// pipeline receives a clone and never observes later changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub mode: Mode,
    pub backend: Backend,

    /// Cloud API credential.
    pub api_key: Option<String>,
    /// Local voice conversion / separation server.
    pub server: String,
    /// Local audio transform server.
    pub stability_server: String,
    pub stable_prompt: String,

    pub uvr_model: String,
    pub uvr_shifts: f64,
    pub uvr_segment: f64,

    pub source_path: Option<PathBuf>,

    pub rvc_model: Option<String>,
    pub model_url: Option<String>,
    pub output_format: String,
    /// Legacy per-model pitch field kept for the cloud input schema.
    pub pitch_change: String,
    pub index_rate: f64,
    pub filter_radius: f64,
    pub rms_mix_rate: f64,
    pub pitch_detection_algorithm: String,
    pub crepe_hop_length: f64,
    pub protect: f64,
    pub main_vocals_volume_change: f64,
    pub backup_vocals_volume_change: f64,
    pub instrumental_volume_change: f64,
    pub pitch_change_all: f64,

    pub separate: bool,
    pub stem: String,

    /// Secondary refinement pass on the local voice server.
    pub applio_enabled: bool,
    pub applio_model: Option<String>,

    pub normalize: bool,
    pub target_db: f64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Voice,
            backend: Backend::Cloud,
            api_key: None,
            server: DEFAULT_SERVER.to_string(),
            stability_server: DEFAULT_STABILITY_SERVER.to_string(),
            stable_prompt: String::new(),
            uvr_model: "htdemucs".to_string(),
            uvr_shifts: 1.0,
            uvr_segment: 0.0,
            source_path: None,
            rvc_model: None,
            model_url: None,
            output_format: "wav".to_string(),
            pitch_change: "no-change".to_string(),
            index_rate: 0.5,
            filter_radius: 3.0,
            rms_mix_rate: 0.25,
            pitch_detection_algorithm: "rmvpe".to_string(),
            crepe_hop_length: 128.0,
            protect: 0.33,
            main_vocals_volume_change: 0.0,
            backup_vocals_volume_change: 0.0,
            instrumental_volume_change: 0.0,
            pitch_change_all: 0.0,
            separate: false,
            stem: "vocals".to_string(),
            applio_enabled: false,
            applio_model: None,
            normalize: true,
            target_db: -0.1,
        }
    }
}

impl JobConfig {
    /// The source file a job will read, or a `Config` error when unset.
    pub fn source(&self) -> Result<&Path, DomainError> {
        self.source_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| DomainError::Config("No source file".to_string()))
    }

    /// Local server base with any trailing slashes removed.
    pub fn server_base(&self) -> &str {
        self.server.trim_end_matches('/')
    }

    /// Transform server base with any trailing slashes removed.
    pub fn stability_base(&self) -> &str {
        self.stability_server.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_parameter_set() {
        let config = JobConfig::default();
        assert_eq!(config.mode, Mode::Voice);
        assert_eq!(config.backend, Backend::Cloud);
        assert_eq!(config.server, "http://127.0.0.1:8000");
        assert_eq!(config.stability_server, "http://127.0.0.1:7860");
        assert_eq!(config.uvr_model, "htdemucs");
        assert_eq!(config.index_rate, 0.5);
        assert_eq!(config.crepe_hop_length, 128.0);
        assert_eq!(config.target_db, -0.1);
        assert!(config.normalize);
        assert!(!config.separate);
    }

    #[test]
    fn source_is_required() {
        let mut config = JobConfig::default();
        assert!(config.source().is_err());

        config.source_path = Some(PathBuf::from("/tmp/in.wav"));
        assert_eq!(config.source().unwrap(), Path::new("/tmp/in.wav"));
    }

    #[test]
    fn server_bases_strip_trailing_slashes() {
        let mut config = JobConfig::default();
        config.server = "http://host:8000///".to_string();
        config.stability_server = "http://host:7860/".to_string();
        assert_eq!(config.server_base(), "http://host:8000");
        assert_eq!(config.stability_base(), "http://host:7860");
    }
}
