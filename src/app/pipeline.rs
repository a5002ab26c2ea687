use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::normalizer::normalize_wav;
use crate::adapters::{
    CloudVoiceClient, LocalSeparationClient, LocalTransformClient, LocalVoiceClient, OutputStore,
};
use crate::domain::{DomainError, JobConfig, PipelineKind, ProcessingResult, SourceKind};
use crate::ports::{BackendClient, EventSink, HttpGateway, SourceAudio};

/// Run one job end to end: read the source, submit to the resolved backend,
/// materialize the response, normalize WAV outputs where applicable, and
/// close with the terminal events.
///
/// Errors propagate to the caller, which owns converting them into a single
/// `error` event.
pub async fn run(
    job: JobConfig,
    gateway: Arc<dyn HttpGateway>,
    store: &OutputStore,
    events: &dyn EventSink,
) -> Result<ProcessingResult, DomainError> {
    let source_path = job.source()?.to_path_buf();
    let source = SourceAudio::read(&source_path).await?;

    let kind = PipelineKind::resolve(job.mode, job.backend);
    let client: Box<dyn BackendClient> = match kind {
        PipelineKind::CloudVoice => Box::new(CloudVoiceClient::new(gateway)),
        PipelineKind::LocalVoice => Box::new(LocalVoiceClient::new(gateway)),
        PipelineKind::LocalSeparation => Box::new(LocalSeparationClient::new(gateway)),
        PipelineKind::LocalTransform => Box::new(LocalTransformClient::new(gateway)),
    };
    info!(backend = client.name(), source = ?source_path, "Starting job");
    events.status(&format!("Submitting to {}…", client.name()));
    let response = client.submit(&job, &source).await?;

    let result = match kind {
        // Separation responses are always a bundle of stems.
        PipelineKind::LocalSeparation => store.expand_bundle(&response.bytes, "uvr", events).await?,
        // The voice server returns a bundle only when refinement is on;
        // the content type decides.
        PipelineKind::LocalVoice => store.materialize(&response, "rvc", events).await?,
        PipelineKind::CloudVoice => store.write_single(&response, "rvc").await?,
        PipelineKind::LocalTransform => store.write_single(&response, "stable").await?,
    };

    // The local voice server normalizes on its side (the flag travels in the
    // form); cloud and transform results are normalized here.
    if job.normalize && matches!(kind, PipelineKind::CloudVoice | PipelineKind::LocalTransform) {
        for output in &result.outputs {
            if output.path.extension().and_then(|e| e.to_str()) != Some("wav") {
                continue;
            }
            events.status("Normalizing audio…");
            // Decode/encode of a whole waveform belongs on the blocking pool.
            let path = output.path.clone();
            let target_db = job.target_db;
            let outcome = tokio::task::spawn_blocking(move || normalize_wav(&path, target_db))
                .await
                .map_err(|e| DomainError::Normalization(e.to_string()))
                .and_then(|res| res);
            match outcome {
                Ok(()) => events.status(&format!("Normalized to {} dBFS", job.target_db)),
                Err(err) => {
                    // Non-fatal: the un-normalized file stays the deliverable.
                    warn!(path = ?output.path, error = %err, "Normalization failed");
                    events.error(&err.to_string());
                }
            }
        }
    }

    // Bundle members were reported during expansion; single files are
    // reported here, after normalization, so the host gets the final bytes.
    let mut had_single = false;
    for output in &result.outputs {
        if output.kind == SourceKind::SingleFile {
            events.done(&output.path);
            had_single = true;
        }
    }
    if had_single {
        events.progress(100);
    }
    events.status("Done");
    info!(outputs = result.outputs.len(), "Job finished");
    Ok(result)
}
