use thiserror::Error;
use vaani_types::VoiceProvider;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: VoiceProvider,
        status: u16,
        body: String,
    },

    #[error("{provider} returned invalid audio: {reason}")]
    InvalidAudio {
        provider: VoiceProvider,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
