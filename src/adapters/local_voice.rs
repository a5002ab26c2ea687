use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::domain::{DomainError, JobConfig};
use crate::ports::{BackendClient, HttpGateway, SourceAudio, WireResponse};

/// Local voice conversion client (`POST {server}/convert`).
///
/// The response is either a single media file or, when the refinement pass is
/// enabled server-side, a zip bundle; the caller decides by content type.
pub struct LocalVoiceClient {
    gateway: Arc<dyn HttpGateway>,
}

impl LocalVoiceClient {
    pub fn new(gateway: Arc<dyn HttpGateway>) -> Self {
        Self { gateway }
    }

    fn build_form(job: &JobConfig, source: &SourceAudio) -> Result<Form, DomainError> {
        let file = Part::bytes(source.bytes.clone())
            .file_name(source.file_name.clone())
            .mime_str(source.mime())
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file)
            .text("rvc_model", job.rvc_model.clone().unwrap_or_default())
            .text("output_format", job.output_format.clone())
            .text("index_rate", job.index_rate.to_string())
            .text("filter_radius", job.filter_radius.to_string())
            .text("rms_mix_rate", job.rms_mix_rate.to_string())
            .text(
                "pitch_detection_algorithm",
                job.pitch_detection_algorithm.clone(),
            )
            .text("crepe_hop_length", job.crepe_hop_length.to_string())
            .text("protect", job.protect.to_string())
            .text(
                "main_vocals_volume_change",
                job.main_vocals_volume_change.to_string(),
            )
            .text(
                "backup_vocals_volume_change",
                job.backup_vocals_volume_change.to_string(),
            )
            .text(
                "instrumental_volume_change",
                job.instrumental_volume_change.to_string(),
            )
            .text("pitch_change_all", job.pitch_change_all.to_string())
            .text("normalize", job.normalize.to_string())
            .text("target_db", job.target_db.to_string())
            .text("separate", job.separate.to_string())
            .text("stem", job.stem.clone())
            .text("applio_enabled", job.applio_enabled.to_string())
            .text("applio_model", job.applio_model.clone().unwrap_or_default());

        if !job.uvr_model.is_empty() {
            form = form.text("demucs_model", job.uvr_model.clone());
        }
        Ok(form)
    }
}

#[async_trait]
impl BackendClient for LocalVoiceClient {
    fn name(&self) -> &'static str {
        "local voice conversion"
    }

    async fn submit(
        &self,
        job: &JobConfig,
        source: &SourceAudio,
    ) -> Result<WireResponse, DomainError> {
        let url = format!("{}/convert", job.server_base());
        info!(url = %url, "Uploading source for voice conversion");
        let form = Self::build_form(job, source)?;
        self.gateway.post_multipart(&url, form, None).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testutil::MockGateway;

    fn source() -> SourceAudio {
        SourceAudio {
            file_name: "take.wav".to_string(),
            bytes: vec![0; 16],
        }
    }

    #[tokio::test]
    async fn posts_to_the_convert_route() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script_multipart(Ok(WireResponse::new(vec![1], "audio/wav")));

        let mut job = JobConfig::default();
        job.server = "http://127.0.0.1:8000/".to_string();

        let response = LocalVoiceClient::new(gateway.clone())
            .submit(&job, &source())
            .await
            .unwrap();
        assert_eq!(response.bytes, vec![1]);
        assert_eq!(
            gateway.requested_urls(),
            vec!["http://127.0.0.1:8000/convert".to_string()]
        );
    }

    #[tokio::test]
    async fn server_failure_carries_status_and_body() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script_multipart(Err(DomainError::Backend {
            status: 500,
            body: "model not loaded".to_string(),
        }));

        let err = LocalVoiceClient::new(gateway)
            .submit(&JobConfig::default(), &source())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("model not loaded"));
    }
}
