use std::path::{Path, PathBuf};

/// One lifecycle notification. Fire-and-forget, no acknowledgment.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Status(String),
    /// Integer percentage, 0-100.
    Progress(u8),
    Error(String),
    Done(PathBuf),
}

/// Outlet for job lifecycle events.
///
/// A job may emit several `Done` events (one per bundle member); a successful
/// job always closes with `Progress(100)` and `Status("Done")`.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: JobEvent);

    fn status(&self, text: &str) {
        self.emit(JobEvent::Status(text.to_string()));
    }

    fn progress(&self, percent: u8) {
        self.emit(JobEvent::Progress(percent.min(100)));
    }

    fn error(&self, text: &str) {
        self.emit(JobEvent::Error(text.to_string()));
    }

    fn done(&self, path: &Path) {
        self.emit(JobEvent::Done(path.to_path_buf()));
    }
}
