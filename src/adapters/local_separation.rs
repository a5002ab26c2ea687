use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::domain::{DomainError, JobConfig};
use crate::ports::{BackendClient, HttpGateway, SourceAudio, WireResponse};

/// Local stem separation client (`POST {server}/uvr`).
///
/// The response is always a zip bundle of per-stem files.
pub struct LocalSeparationClient {
    gateway: Arc<dyn HttpGateway>,
}

impl LocalSeparationClient {
    pub fn new(gateway: Arc<dyn HttpGateway>) -> Self {
        Self { gateway }
    }

    fn build_form(job: &JobConfig, source: &SourceAudio) -> Result<Form, DomainError> {
        let file = Part::bytes(source.bytes.clone())
            .file_name(source.file_name.clone())
            .mime_str(source.mime())
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let mut form = Form::new().part("file", file);
        if !job.uvr_model.is_empty() {
            form = form.text("model", job.uvr_model.clone());
        }
        if job.uvr_shifts.is_finite() {
            form = form.text("shifts", job.uvr_shifts.to_string());
        }
        // Segment length is optional; the server default applies at zero.
        if job.uvr_segment.is_finite() && job.uvr_segment > 0.0 {
            form = form.text("segment", job.uvr_segment.to_string());
        }
        Ok(form)
    }
}

#[async_trait]
impl BackendClient for LocalSeparationClient {
    fn name(&self) -> &'static str {
        "stem separation"
    }

    async fn submit(
        &self,
        job: &JobConfig,
        source: &SourceAudio,
    ) -> Result<WireResponse, DomainError> {
        let url = format!("{}/uvr", job.server_base());
        info!(url = %url, model = %job.uvr_model, "Uploading source for stem separation");
        let form = Self::build_form(job, source)?;
        self.gateway.post_multipart(&url, form, None).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testutil::MockGateway;

    #[tokio::test]
    async fn posts_to_the_uvr_route() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script_multipart(Ok(WireResponse::new(vec![1], "application/zip")));

        let source = SourceAudio {
            file_name: "mix.wav".to_string(),
            bytes: vec![0; 8],
        };
        let response = LocalSeparationClient::new(gateway.clone())
            .submit(&JobConfig::default(), &source)
            .await
            .unwrap();
        assert_eq!(response.content_type, "application/zip");
        assert_eq!(
            gateway.requested_urls(),
            vec!["http://127.0.0.1:8000/uvr".to_string()]
        );
    }
}
