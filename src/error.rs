/// Errors reported by a speech recognition adapter.
///
/// These never escape the session: they are logged and reset the listening
/// flags, and the user restarts manually.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    #[error("speech recognition is not supported on this platform")]
    Unsupported,
    #[error("microphone permission denied")]
    NotAllowed,
    #[error("no speech detected")]
    NoSpeech,
    #[error("audio capture failed")]
    AudioCapture,
    #[error("network error: {0}")]
    Network(String),
    #[error("recognition aborted")]
    Aborted,
    #[error("language not supported: {0}")]
    LanguageNotSupported(String),
    #[error("recognition error: {0}")]
    Other(String),
}

impl RecognitionError {
    /// Map a platform error code (`not-allowed`, `no-speech`, ...) to an error.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "not-allowed" | "service-not-allowed" => RecognitionError::NotAllowed,
            "no-speech" => RecognitionError::NoSpeech,
            "audio-capture" => RecognitionError::AudioCapture,
            "network" => RecognitionError::Network("network".to_string()),
            "aborted" => RecognitionError::Aborted,
            "language-not-supported" => RecognitionError::LanguageNotSupported(String::new()),
            "unsupported" => RecognitionError::Unsupported,
            other => RecognitionError::Other(other.to_string()),
        }
    }

    /// Platform error code for logs and diagnostics.
    pub fn code(&self) -> &str {
        match self {
            RecognitionError::Unsupported => "unsupported",
            RecognitionError::NotAllowed => "not-allowed",
            RecognitionError::NoSpeech => "no-speech",
            RecognitionError::AudioCapture => "audio-capture",
            RecognitionError::Network(_) => "network",
            RecognitionError::Aborted => "aborted",
            RecognitionError::LanguageNotSupported(_) => "language-not-supported",
            RecognitionError::Other(code) => code.as_str(),
        }
    }
}
