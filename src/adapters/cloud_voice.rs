use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::{DomainError, JobConfig};
use crate::ports::{BackendClient, HttpGateway, SourceAudio, WireResponse};

/// Fixed remote voice conversion model.
const MODEL_SLUG: &str = "zsxkib/realistic-voice-cloning";
const API_BASE: &str = "https://api.replicate.com/v1";
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Cloud voice conversion client.
///
/// Creates a prediction against the fixed model, waits for a terminal status,
/// then downloads the first referenced output.
pub struct CloudVoiceClient {
    gateway: Arc<dyn HttpGateway>,
}

impl CloudVoiceClient {
    pub fn new(gateway: Arc<dyn HttpGateway>) -> Self {
        Self { gateway }
    }

    fn predictions_url() -> String {
        format!("{}/models/{}/predictions", API_BASE, MODEL_SLUG)
    }

    /// Input object for the remote model, source audio embedded as a data URI.
    fn build_input(job: &JobConfig, source: &SourceAudio) -> Value {
        let mut input = json!({
            "song_input": format!("data:{};base64,{}", source.mime(), BASE64.encode(&source.bytes)),
            "output_format": job.output_format,
            "pitch_change": job.pitch_change,
            "index_rate": job.index_rate,
            "filter_radius": job.filter_radius,
            "rms_mix_rate": job.rms_mix_rate,
            "pitch_detection_algorithm": job.pitch_detection_algorithm,
            "crepe_hop_length": job.crepe_hop_length,
            "protect": job.protect,
            "main_vocals_volume_change": job.main_vocals_volume_change,
            "backup_vocals_volume_change": job.backup_vocals_volume_change,
            "instrumental_volume_change": job.instrumental_volume_change,
            "pitch_change_all": job.pitch_change_all,
        });
        if let Some(url) = &job.model_url {
            input["custom_rvc_model_download_url"] = json!(url);
        }
        if let Some(model) = &job.rvc_model {
            input["rvc_model"] = json!(model);
        }
        input
    }

    /// Wait out non-terminal prediction states. The create call asks the API
    /// to block, but long jobs still come back as `starting`/`processing`.
    async fn resolve(&self, mut prediction: Value, token: &str) -> Result<Value, DomainError> {
        loop {
            match prediction["status"].as_str().unwrap_or_default() {
                "succeeded" => return Ok(prediction),
                "failed" | "canceled" => {
                    let detail = prediction["error"]
                        .as_str()
                        .unwrap_or("no error detail")
                        .to_string();
                    return Err(DomainError::Prediction(detail));
                }
                other => {
                    debug!(status = other, "Prediction not terminal yet, polling");
                    let poll_url = prediction["urls"]["get"]
                        .as_str()
                        .map(str::to_string)
                        .or_else(|| {
                            prediction["id"]
                                .as_str()
                                .map(|id| format!("{}/predictions/{}", API_BASE, id))
                        })
                        .ok_or_else(|| {
                            DomainError::Transport("Prediction response had no id".to_string())
                        })?;
                    tokio::time::sleep(POLL_INTERVAL).await;
                    prediction = self.gateway.get_json(&poll_url, Some(token)).await?;
                }
            }
        }
    }

    /// The first output URL of a finished prediction.
    fn output_url(prediction: &Value) -> Result<String, DomainError> {
        let output = &prediction["output"];
        let url = match output {
            Value::String(url) => Some(url.clone()),
            Value::Array(urls) => urls.first().and_then(|v| v.as_str()).map(str::to_string),
            _ => None,
        };
        url.filter(|u| !u.is_empty()).ok_or(DomainError::EmptyResult)
    }
}

#[async_trait]
impl BackendClient for CloudVoiceClient {
    fn name(&self) -> &'static str {
        "cloud voice conversion"
    }

    async fn submit(
        &self,
        job: &JobConfig,
        source: &SourceAudio,
    ) -> Result<WireResponse, DomainError> {
        let token = job
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::Config("Missing API key".to_string()))?;

        let body = json!({ "input": Self::build_input(job, source) });
        let prediction = self
            .gateway
            .post_json(
                &Self::predictions_url(),
                Some(token),
                &[("Prefer", "wait")],
                &body,
            )
            .await?;

        let prediction = self.resolve(prediction, token).await?;
        let url = Self::output_url(&prediction)?;
        info!(url = %url, "Prediction finished, downloading result");
        self.gateway.fetch_bytes(&url).await
    }
}
