use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How an output file came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The backend returned exactly this file.
    SingleFile,
    /// The file was discovered inside an expanded bundle.
    ArchiveMember,
}

/// One materialized output file. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

/// Everything one job produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub outputs: Vec<OutputFile>,
}

impl ProcessingResult {
    pub fn single(path: PathBuf) -> Self {
        Self {
            outputs: vec![OutputFile {
                path,
                kind: SourceKind::SingleFile,
            }],
        }
    }

    pub fn bundle(paths: Vec<PathBuf>) -> Self {
        Self {
            outputs: paths
                .into_iter()
                .map(|path| OutputFile {
                    path,
                    kind: SourceKind::ArchiveMember,
                })
                .collect(),
        }
    }
}
