use std::path::Path;

use async_trait::async_trait;

use crate::domain::{DomainError, JobConfig};
use crate::ports::http::WireResponse;

/// Source audio loaded into memory for one submission.
#[derive(Debug, Clone)]
pub struct SourceAudio {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SourceAudio {
    /// Read the source file for a job.
    pub async fn read(path: &Path) -> Result<Self, DomainError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("input.wav")
            .to_string();
        Ok(Self { file_name, bytes })
    }

    /// Content type guessed from the file extension, for upload parts.
    pub fn mime(&self) -> &'static str {
        let lower = self.file_name.to_ascii_lowercase();
        if lower.ends_with(".mp3") {
            "audio/mpeg"
        } else if lower.ends_with(".ogg") {
            "audio/ogg"
        } else if lower.ends_with(".flac") {
            "audio/flac"
        } else if lower.ends_with(".wav") {
            "audio/wav"
        } else {
            "application/octet-stream"
        }
    }
}

/// Uniform submission contract every backend variant implements.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Human-readable name used in status events and logs.
    fn name(&self) -> &'static str;

    /// Submit one job and return the raw response payload.
    async fn submit(
        &self,
        job: &JobConfig,
        source: &SourceAudio,
    ) -> Result<WireResponse, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_the_extension() {
        let audio = |name: &str| SourceAudio {
            file_name: name.to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(audio("take.WAV").mime(), "audio/wav");
        assert_eq!(audio("take.mp3").mime(), "audio/mpeg");
        assert_eq!(audio("take.bin").mime(), "application/octet-stream");
    }
}
