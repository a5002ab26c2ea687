use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::domain::{DomainError, JobConfig};
use crate::ports::{BackendClient, HttpGateway, SourceAudio, WireResponse};

const TRANSFORM_ROUTE: &str = "/v2beta/stable-audio/transform";

/// Local audio-to-audio transform client.
///
/// Sends the source plus an optional prompt to the transform server; the
/// response is a single media file whose container follows the content type.
pub struct LocalTransformClient {
    gateway: Arc<dyn HttpGateway>,
}

impl LocalTransformClient {
    pub fn new(gateway: Arc<dyn HttpGateway>) -> Self {
        Self { gateway }
    }

    fn build_form(job: &JobConfig, source: &SourceAudio) -> Result<Form, DomainError> {
        let file = Part::bytes(source.bytes.clone())
            .file_name(source.file_name.clone())
            .mime_str(source.mime())
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let mut form = Form::new().part("input_audio", file);
        if !job.stable_prompt.is_empty() {
            form = form.text("prompt", job.stable_prompt.clone());
        }
        let format = if job.output_format.is_empty() {
            "wav".to_string()
        } else {
            job.output_format.clone()
        };
        Ok(form.text("output_format", format))
    }
}

#[async_trait]
impl BackendClient for LocalTransformClient {
    fn name(&self) -> &'static str {
        "audio transform"
    }

    async fn submit(
        &self,
        job: &JobConfig,
        source: &SourceAudio,
    ) -> Result<WireResponse, DomainError> {
        let url = format!("{}{}", job.stability_base(), TRANSFORM_ROUTE);
        info!(url = %url, "Uploading source for audio transform");
        let form = Self::build_form(job, source)?;
        self.gateway.post_multipart(&url, form, Some("audio/*")).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testutil::MockGateway;

    #[tokio::test]
    async fn posts_to_the_transform_route_on_the_transform_server() {
        let gateway = Arc::new(MockGateway::new());
        gateway.script_multipart(Ok(WireResponse::new(vec![1], "audio/mpeg")));

        let mut job = JobConfig::default();
        job.stability_server = "http://127.0.0.1:7860///".to_string();
        job.stable_prompt = "more cowbell".to_string();

        let source = SourceAudio {
            file_name: "loop.wav".to_string(),
            bytes: vec![0; 8],
        };
        let response = LocalTransformClient::new(gateway.clone())
            .submit(&job, &source)
            .await
            .unwrap();
        assert_eq!(response.content_type, "audio/mpeg");
        assert_eq!(
            gateway.requested_urls(),
            vec!["http://127.0.0.1:7860/v2beta/stable-audio/transform".to_string()]
        );
    }
}
