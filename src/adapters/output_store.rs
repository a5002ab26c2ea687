use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::domain::{DomainError, ProcessingResult};
use crate::ports::{EventSink, WireResponse};

/// Audio containers recognized inside expanded bundles.
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

/// Process-wide sequence so output names never collide within one lifetime.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Materializes backend responses into files under a fixed output root.
///
/// Single media responses become one timestamped file; zip bundles are
/// expanded into a timestamped subdirectory and every contained audio file
/// becomes one output, reported with per-entry progress and `done` events.
pub struct OutputStore {
    base_dir: PathBuf,
}

impl OutputStore {
    /// Create the store, making sure the output root exists.
    pub fn new(base_dir: PathBuf) -> Result<Self, DomainError> {
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Materialize a response, branching on its declared content type.
    pub async fn materialize(
        &self,
        response: &WireResponse,
        label: &str,
        events: &dyn EventSink,
    ) -> Result<ProcessingResult, DomainError> {
        if is_archive(&response.content_type) {
            self.expand_bundle(&response.bytes, label, events).await
        } else {
            self.write_single(response, label).await
        }
    }

    /// Write a single media response to one new file. Lifecycle events for
    /// the file are left to the caller so normalization can run first.
    pub async fn write_single(
        &self,
        response: &WireResponse,
        label: &str,
    ) -> Result<ProcessingResult, DomainError> {
        let ext = extension_for(&response.content_type);
        let path = self
            .base_dir
            .join(format!("{}_{}.{}", label, next_token(), ext));
        tokio::fs::write(&path, &response.bytes).await?;
        info!(path = ?path, bytes = response.bytes.len(), "Wrote output file");
        Ok(ProcessingResult::single(path))
    }

    /// Expand a zip bundle into a fresh subdirectory and report every
    /// contained audio file.
    pub async fn expand_bundle(
        &self,
        bytes: &[u8],
        label: &str,
        events: &dyn EventSink,
    ) -> Result<ProcessingResult, DomainError> {
        // The archive itself is disposable; it lives in a per-job temp dir.
        let staging = tempfile::tempdir()?;
        let archive_path = staging.path().join("bundle.zip");
        tokio::fs::write(&archive_path, bytes).await?;

        let out_dir = self.base_dir.join(format!("{}_{}", label, next_token()));
        tokio::fs::create_dir_all(&out_dir).await?;

        // Extraction and traversal are CPU- and disk-bound; keep them off the
        // async executor so other tasks stay responsive.
        let outputs = {
            let out_dir = out_dir.clone();
            tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>, DomainError> {
                let mut archive = ZipArchive::new(File::open(&archive_path)?)?;
                archive.extract(&out_dir)?;
                Ok(collect_audio_files(&out_dir))
            })
            .await
            .map_err(|e| DomainError::Io(e.to_string()))??
        };
        debug!(count = outputs.len(), out_dir = ?out_dir, "Bundle expanded");

        if outputs.is_empty() {
            return Err(DomainError::EmptyArchive);
        }

        let total = outputs.len();
        for (index, path) in outputs.iter().enumerate() {
            let percent = (100.0 * (index + 1) as f64 / total as f64).min(99.0).round();
            events.progress(percent as u8);
            events.done(path);
        }
        events.progress(100);
        info!(count = total, out_dir = ?out_dir, "Bundle outputs ready");
        Ok(ProcessingResult::bundle(outputs))
    }
}

/// Depth-first, name-sorted traversal so bundle output order is stable.
fn collect_audio_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

fn is_archive(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("zip")
}

/// File extension for a single media response.
fn extension_for(content_type: &str) -> &'static str {
    let ct = content_type.to_ascii_lowercase();
    if ct.contains("mpeg") {
        "mp3"
    } else if ct.contains("ogg") {
        "ogg"
    } else {
        "wav"
    }
}

fn next_token() -> String {
    format!(
        "{}_{:03}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        SEQUENCE.fetch_add(1, Ordering::Relaxed)
    )
}
