#![forbid(unsafe_code)]

//! VoxRoute routes one local audio file to a voice conversion, stem separation,
//! or audio transform backend, materializes the result (single file or zip
//! bundle) under an output root, optionally peak-normalizes WAV outputs, and
//! reports lifecycle events to the embedding host.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod ports;

#[cfg(test)]
pub(crate) mod testutil;

pub use app::JobController;
pub use domain::{
    Backend, Command, DomainError, JobConfig, Mode, OutputFile, PipelineKind, ProcessingResult,
    SourceKind,
};
pub use ports::{EventSink, JobEvent};
