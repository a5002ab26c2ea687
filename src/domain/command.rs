use url::Url;

use crate::domain::config::{JobConfig, DEFAULT_SERVER, DEFAULT_STABILITY_SERVER};
use crate::domain::error::DomainError;
use crate::domain::routing::{Backend, Mode};

/// Free-text string parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextParam {
    RvcModel,
    ModelUrl,
    OutputFormat,
    PitchChange,
    PitchDetectionAlgorithm,
    Stem,
    ApplioModel,
}

impl TextParam {
    pub fn name(&self) -> &'static str {
        match self {
            TextParam::RvcModel => "rvc_model",
            TextParam::ModelUrl => "model_url",
            TextParam::OutputFormat => "output_format",
            TextParam::PitchChange => "pitch_change",
            TextParam::PitchDetectionAlgorithm => "pitch_detection_algorithm",
            TextParam::Stem => "stem",
            TextParam::ApplioModel => "applio_model",
        }
    }
}

/// Numeric parameters. Values must be finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberParam {
    IndexRate,
    FilterRadius,
    RmsMixRate,
    CrepeHopLength,
    Protect,
    MainVocalsVolumeChange,
    BackupVocalsVolumeChange,
    InstrumentalVolumeChange,
    PitchChangeAll,
    TargetDb,
    UvrShifts,
    UvrSegment,
}

impl NumberParam {
    pub fn name(&self) -> &'static str {
        match self {
            NumberParam::IndexRate => "index_rate",
            NumberParam::FilterRadius => "filter_radius",
            NumberParam::RmsMixRate => "rms_mix_rate",
            NumberParam::CrepeHopLength => "crepe_hop_length",
            NumberParam::Protect => "protect",
            NumberParam::MainVocalsVolumeChange => "main_vocals_volume_change",
            NumberParam::BackupVocalsVolumeChange => "backup_vocals_volume_change",
            NumberParam::InstrumentalVolumeChange => "instrumental_volume_change",
            NumberParam::PitchChangeAll => "pitch_change_all",
            NumberParam::TargetDb => "target_db",
            NumberParam::UvrShifts => "uvr_shifts",
            NumberParam::UvrSegment => "uvr_segment",
        }
    }
}

/// Boolean toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagParam {
    Separate,
    Normalize,
    ApplioEnabled,
}

impl FlagParam {
    pub fn name(&self) -> &'static str {
        match self {
            FlagParam::Separate => "separate",
            FlagParam::Normalize => "normalize",
            FlagParam::ApplioEnabled => "applio_enabled",
        }
    }
}

/// A validated configuration mutation.
///
/// `parse` is the dispatch table from the host's named commands to typed
/// variants; invalid input is rejected here so `apply` is infallible and the
/// config is never left half-updated.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetMode(String),
    SetBackend(String),
    SetApiKey(String),
    SetServer(String),
    SetStabilityServer(String),
    SetSource(String),
    SetStablePrompt(String),
    SetUvrModel(String),
    SetText(TextParam, String),
    SetNumber(NumberParam, f64),
    SetFlag(FlagParam, bool),
}

impl Command {
    /// Parse a named command with a raw string value.
    pub fn parse(name: &str, value: &str) -> Result<Command, DomainError> {
        let trimmed = value.trim().to_string();
        let command = match name {
            "mode" => Command::SetMode(trimmed),
            "backend" => Command::SetBackend(trimmed),
            "apikey" => Command::SetApiKey(trimmed),
            "server" => Command::SetServer(Self::parse_server(name, &trimmed)?),
            "stability_server" => {
                Command::SetStabilityServer(Self::parse_server(name, &trimmed)?)
            }
            "source" => Command::SetSource(trimmed),
            "stable_prompt" => Command::SetStablePrompt(trimmed),
            "uvr_model" => Command::SetUvrModel(trimmed),
            "rvc_model" => Command::SetText(TextParam::RvcModel, trimmed),
            "model_url" => Command::SetText(TextParam::ModelUrl, trimmed),
            "output_format" => Command::SetText(TextParam::OutputFormat, trimmed),
            "pitch_change" => Command::SetText(TextParam::PitchChange, trimmed),
            "pitch_detection_algorithm" => {
                Command::SetText(TextParam::PitchDetectionAlgorithm, trimmed)
            }
            "stem" => Command::SetText(TextParam::Stem, trimmed),
            "applio_model" => Command::SetText(TextParam::ApplioModel, trimmed),
            "index_rate" => Self::parse_number(NumberParam::IndexRate, value)?,
            "filter_radius" => Self::parse_number(NumberParam::FilterRadius, value)?,
            "rms_mix_rate" => Self::parse_number(NumberParam::RmsMixRate, value)?,
            "crepe_hop_length" => Self::parse_number(NumberParam::CrepeHopLength, value)?,
            "protect" => Self::parse_number(NumberParam::Protect, value)?,
            "main_vocals_volume_change" => {
                Self::parse_number(NumberParam::MainVocalsVolumeChange, value)?
            }
            "backup_vocals_volume_change" => {
                Self::parse_number(NumberParam::BackupVocalsVolumeChange, value)?
            }
            "instrumental_volume_change" => {
                Self::parse_number(NumberParam::InstrumentalVolumeChange, value)?
            }
            "pitch_change_all" => Self::parse_number(NumberParam::PitchChangeAll, value)?,
            "target_db" => Self::parse_number(NumberParam::TargetDb, value)?,
            "uvr_shifts" => Self::parse_number(NumberParam::UvrShifts, value)?,
            "uvr_segment" => Self::parse_number(NumberParam::UvrSegment, value)?,
            "separate" => Command::SetFlag(FlagParam::Separate, parse_flag(value)),
            "normalize" => Command::SetFlag(FlagParam::Normalize, parse_flag(value)),
            "applio_enabled" => Command::SetFlag(FlagParam::ApplioEnabled, parse_flag(value)),
            other => return Err(DomainError::UnknownParameter(other.to_string())),
        };
        Ok(command)
    }

    fn parse_number(param: NumberParam, value: &str) -> Result<Command, DomainError> {
        let parsed = value.trim().parse::<f64>().ok().filter(|n| n.is_finite());
        match parsed {
            Some(n) => Ok(Command::SetNumber(param, n)),
            None => Err(DomainError::Validation {
                param: param.name().to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn parse_server(name: &str, value: &str) -> Result<String, DomainError> {
        if value.is_empty() {
            return Ok(String::new());
        }
        Url::parse(value)
            .map_err(|_| DomainError::Config(format!("Invalid URL for {}: {}", name, value)))?;
        Ok(value.to_string())
    }
}

/// Truthy flag values: non-zero numbers or the literal `true`.
fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        return true;
    }
    value.parse::<f64>().map(|n| n != 0.0).unwrap_or(false)
}

impl JobConfig {
    /// Apply a validated command and return the status line to report.
    pub fn apply(&mut self, command: Command) -> String {
        match command {
            Command::SetMode(text) => {
                self.mode = Mode::classify(&text);
                format!("Mode: {}", self.mode.as_str())
            }
            Command::SetBackend(text) => {
                self.backend = Backend::classify(&text);
                format!("Backend: {}", self.backend.as_str())
            }
            Command::SetApiKey(key) => {
                self.api_key = non_empty(key);
                "API key set".to_string()
            }
            // An empty value resets the server to its default.
            Command::SetServer(server) => {
                self.server = if server.is_empty() {
                    DEFAULT_SERVER.to_string()
                } else {
                    server
                };
                format!("Server: {}", self.server)
            }
            Command::SetStabilityServer(server) => {
                self.stability_server = if server.is_empty() {
                    DEFAULT_STABILITY_SERVER.to_string()
                } else {
                    server
                };
                format!("Stable Audio server: {}", self.stability_server)
            }
            Command::SetSource(path) => {
                self.source_path = non_empty(path.clone()).map(Into::into);
                format!("Source: {}", path)
            }
            Command::SetStablePrompt(prompt) => {
                self.stable_prompt = prompt;
                format!("stable_prompt={}", self.stable_prompt)
            }
            Command::SetUvrModel(model) => {
                self.uvr_model = non_empty(model).unwrap_or_else(|| "htdemucs".to_string());
                format!("uvr_model={}", self.uvr_model)
            }
            Command::SetText(param, value) => {
                let status = format!("{}={}", param.name(), value);
                match param {
                    TextParam::RvcModel => self.rvc_model = non_empty(value),
                    TextParam::ModelUrl => self.model_url = non_empty(value),
                    TextParam::OutputFormat => self.output_format = value,
                    TextParam::PitchChange => self.pitch_change = value,
                    TextParam::PitchDetectionAlgorithm => self.pitch_detection_algorithm = value,
                    TextParam::Stem => self.stem = value,
                    TextParam::ApplioModel => self.applio_model = non_empty(value),
                }
                status
            }
            Command::SetNumber(param, value) => {
                match param {
                    NumberParam::IndexRate => self.index_rate = value,
                    NumberParam::FilterRadius => self.filter_radius = value,
                    NumberParam::RmsMixRate => self.rms_mix_rate = value,
                    NumberParam::CrepeHopLength => self.crepe_hop_length = value,
                    NumberParam::Protect => self.protect = value,
                    NumberParam::MainVocalsVolumeChange => {
                        self.main_vocals_volume_change = value
                    }
                    NumberParam::BackupVocalsVolumeChange => {
                        self.backup_vocals_volume_change = value
                    }
                    NumberParam::InstrumentalVolumeChange => {
                        self.instrumental_volume_change = value
                    }
                    NumberParam::PitchChangeAll => self.pitch_change_all = value,
                    NumberParam::TargetDb => self.target_db = value,
                    NumberParam::UvrShifts => self.uvr_shifts = value,
                    NumberParam::UvrSegment => self.uvr_segment = value,
                }
                format!("{}={}", param.name(), value)
            }
            Command::SetFlag(param, value) => {
                match param {
                    FlagParam::Separate => self.separate = value,
                    FlagParam::Normalize => self.normalize = value,
                    FlagParam::ApplioEnabled => self.applio_enabled = value,
                }
                format!("{}={}", param.name(), value)
            }
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_parameters_reject_non_numbers() {
        let err = Command::parse("index_rate", "fast").unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let err = Command::parse("target_db", "NaN").unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn numeric_parameters_accept_finite_values() {
        let cmd = Command::parse("protect", "0.4").unwrap();
        assert_eq!(cmd, Command::SetNumber(NumberParam::Protect, 0.4));
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let err = Command::parse("reverb", "0.5").unwrap_err();
        assert!(matches!(err, DomainError::UnknownParameter(_)));
    }

    #[test]
    fn flags_accept_truthy_numbers_and_literals() {
        assert_eq!(
            Command::parse("separate", "1").unwrap(),
            Command::SetFlag(FlagParam::Separate, true)
        );
        assert_eq!(
            Command::parse("normalize", "0").unwrap(),
            Command::SetFlag(FlagParam::Normalize, false)
        );
        assert_eq!(
            Command::parse("applio_enabled", "true").unwrap(),
            Command::SetFlag(FlagParam::ApplioEnabled, true)
        );
    }

    #[test]
    fn server_must_be_a_url() {
        assert!(Command::parse("server", "127.0.0.1:8000").is_err());
        assert!(Command::parse("server", "http://127.0.0.1:8000").is_ok());
    }

    #[test]
    fn empty_server_value_resets_to_the_default() {
        let mut config = JobConfig::default();
        config.apply(Command::parse("server", "http://host:9000").unwrap());
        assert_eq!(config.server, "http://host:9000");

        let status = config.apply(Command::parse("server", "").unwrap());
        assert_eq!(config.server, DEFAULT_SERVER);
        assert!(status.contains(DEFAULT_SERVER));

        config.apply(Command::parse("stability_server", "http://host:9100").unwrap());
        config.apply(Command::parse("stability_server", "").unwrap());
        assert_eq!(config.stability_server, DEFAULT_STABILITY_SERVER);
    }

    #[test]
    fn mode_assignment_classifies_free_text() {
        let mut config = JobConfig::default();
        let status = config.apply(Command::parse("mode", "UVR split").unwrap());
        assert_eq!(config.mode, Mode::StemSeparation);
        assert_eq!(status, "Mode: uvr");
    }

    #[test]
    fn empty_uvr_model_falls_back_to_default() {
        let mut config = JobConfig::default();
        config.apply(Command::parse("uvr_model", "mdx23c").unwrap());
        assert_eq!(config.uvr_model, "mdx23c");
        config.apply(Command::parse("uvr_model", "").unwrap());
        assert_eq!(config.uvr_model, "htdemucs");
    }

    #[test]
    fn apply_reports_the_assignment() {
        let mut config = JobConfig::default();
        let status = config.apply(Command::parse("index_rate", "0.75").unwrap());
        assert_eq!(status, "index_rate=0.75");
        assert_eq!(config.index_rate, 0.75);
    }
}
