use serde::{Deserialize, Serialize};

/// Processing mode, classified from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Voice,
    StemSeparation,
    Transform,
}

impl Mode {
    /// Classify free text into a mode. Total: unrecognized text is voice.
    pub fn classify(text: &str) -> Self {
        let text = text.trim().to_ascii_lowercase();
        if text.contains("uvr") {
            Mode::StemSeparation
        } else if text.starts_with("stable") {
            Mode::Transform
        } else {
            Mode::Voice
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Voice => "voice",
            Mode::StemSeparation => "uvr",
            Mode::Transform => "stable",
        }
    }
}

/// Where a voice conversion job runs. Only consulted when mode is voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Cloud,
    Local,
}

impl Backend {
    /// Classify free text into a backend. Total: unrecognized text is local.
    pub fn classify(text: &str) -> Self {
        if text.trim().to_ascii_lowercase().starts_with("rep") {
            Backend::Cloud
        } else {
            Backend::Local
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Cloud => "cloud",
            Backend::Local => "local",
        }
    }
}

/// Closed set of pipeline variants a job can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    CloudVoice,
    LocalVoice,
    LocalSeparation,
    LocalTransform,
}

impl PipelineKind {
    /// Resolve a mode/backend pair into the pipeline variant that handles it.
    pub fn resolve(mode: Mode, backend: Backend) -> Self {
        match mode {
            Mode::StemSeparation => PipelineKind::LocalSeparation,
            Mode::Transform => PipelineKind::LocalTransform,
            Mode::Voice => match backend {
                Backend::Cloud => PipelineKind::CloudVoice,
                Backend::Local => PipelineKind::LocalVoice,
            },
        }
    }
}

/// Classify raw mode/backend text straight to a pipeline variant.
pub fn classify(mode_text: &str, backend_text: &str) -> PipelineKind {
    PipelineKind::resolve(Mode::classify(mode_text), Backend::classify(backend_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uvr_substring_selects_stem_separation() {
        assert_eq!(Mode::classify("uvr_demo"), Mode::StemSeparation);
        assert_eq!(Mode::classify("run UVR now"), Mode::StemSeparation);
    }

    #[test]
    fn stable_prefix_selects_transform() {
        assert_eq!(Mode::classify("stable-transform"), Mode::Transform);
        assert_eq!(Mode::classify("Stable Audio"), Mode::Transform);
    }

    #[test]
    fn anything_else_falls_through_to_voice() {
        assert_eq!(Mode::classify(""), Mode::Voice);
        assert_eq!(Mode::classify("voice"), Mode::Voice);
        assert_eq!(Mode::classify("garbage"), Mode::Voice);
    }

    #[test]
    fn rep_prefix_selects_cloud() {
        assert_eq!(Backend::classify("Replicate"), Backend::Cloud);
        assert_eq!(Backend::classify("rep"), Backend::Cloud);
        assert_eq!(Backend::classify("local-server"), Backend::Local);
        assert_eq!(Backend::classify(""), Backend::Local);
    }

    #[test]
    fn voice_mode_dispatches_on_backend() {
        assert_eq!(classify("voice", "Replicate"), PipelineKind::CloudVoice);
        assert_eq!(classify("voice", "local-server"), PipelineKind::LocalVoice);
    }

    #[test]
    fn non_voice_modes_ignore_backend() {
        assert_eq!(classify("uvr_demo", "Replicate"), PipelineKind::LocalSeparation);
        assert_eq!(classify("stable-transform", "Replicate"), PipelineKind::LocalTransform);
    }
}
