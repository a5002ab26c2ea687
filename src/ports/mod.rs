pub mod backend;
pub mod events;
pub mod http;
pub mod settings;

pub use backend::{BackendClient, SourceAudio};
pub use events::{EventSink, JobEvent};
pub use http::{HttpGateway, WireResponse};
pub use settings::SettingsStore;
