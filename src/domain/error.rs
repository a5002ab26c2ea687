use thiserror::Error;

/// Domain-level errors for VoxRoute.
///
/// `Validation` and `UnknownParameter` are raised at assignment time and never
/// reach a running job. `Normalization` is downgraded to a warning event by the
/// pipeline; everything else is terminal for the job it occurs in.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Expected number for {param}, got {value:?}")]
    Validation { param: String, value: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend error {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Cloud prediction failed: {0}")]
    Prediction(String),

    #[error("Backend returned no output")]
    EmptyResult,

    #[error("Archive contained no audio files")]
    EmptyArchive,

    #[error("Normalization failed: {0}")]
    Normalization(String),

    #[error("A job is already in progress")]
    Busy,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        DomainError::Transport(err.to_string())
    }
}

impl From<zip::result::ZipError> for DomainError {
    fn from(err: zip::result::ZipError) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
