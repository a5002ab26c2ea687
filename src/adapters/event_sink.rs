use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::ports::{EventSink, JobEvent};

/// Sink that forwards events over a channel to a host bridge.
pub struct ChannelEventSink {
    tx: UnboundedSender<JobEvent>,
}

impl ChannelEventSink {
    /// Create a sink and the receiving end the host drains.
    pub fn new() -> (Self, UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: JobEvent) {
        // A departed host is not an error the job can act on.
        let _ = self.tx.send(event);
    }
}

/// Sink that only logs, for embedders without an event bridge.
#[derive(Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: JobEvent) {
        match event {
            JobEvent::Status(text) => info!(status = %text, "Job status"),
            JobEvent::Progress(percent) => info!(percent = percent, "Job progress"),
            JobEvent::Error(text) => error!(error = %text, "Job error"),
            JobEvent::Done(path) => info!(path = ?path, "Job output ready"),
        }
    }
}
