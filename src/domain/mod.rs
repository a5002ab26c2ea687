pub mod command;
pub mod config;
pub mod error;
pub mod result;
pub mod routing;
pub mod settings;

pub use command::Command;
pub use config::JobConfig;
pub use error::DomainError;
pub use result::{OutputFile, ProcessingResult, SourceKind};
pub use routing::{Backend, Mode, PipelineKind};
pub use settings::AppSettings;
