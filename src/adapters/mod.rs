pub mod cloud_voice;
pub mod event_sink;
pub mod http_gateway;
pub mod local_separation;
pub mod local_transform;
pub mod local_voice;
pub mod normalizer;
pub mod output_store;
pub mod settings_store;

pub use cloud_voice::CloudVoiceClient;
pub use event_sink::{ChannelEventSink, TracingEventSink};
pub use http_gateway::ReqwestGateway;
pub use local_separation::LocalSeparationClient;
pub use local_transform::LocalTransformClient;
pub use local_voice::LocalVoiceClient;
pub use output_store::OutputStore;
pub use settings_store::TomlSettingsStore;
