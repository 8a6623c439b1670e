use crate::error::VoiceError;
use async_trait::async_trait;
use vaani_types::{SpeechRequest, VoiceProvider};

/// MIME type of every vendor's output; all three are asked for MP3.
pub const MPEG_MIME_TYPE: &str = "audio/mpeg";

/// Longest vendor error body kept for logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Raw audio returned by one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl SynthesizedAudio {
    /// Wraps MP3 bytes, rejecting an empty body.
    pub fn mpeg(provider: VoiceProvider, bytes: Vec<u8>) -> Result<Self, VoiceError> {
        if bytes.is_empty() {
            return Err(VoiceError::InvalidAudio {
                provider,
                reason: "empty audio body".to_string(),
            });
        }
        Ok(Self {
            bytes,
            mime_type: MPEG_MIME_TYPE.to_string(),
        })
    }
}

/// One text-to-speech vendor in the resolver chain.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Which vendor this is; also fixes its position in the chain.
    fn kind(&self) -> VoiceProvider;

    /// Tries to synthesize `request`.
    ///
    /// Returns `Ok(None)` when the vendor lacks what it needs for this
    /// request (credentials, a voice) and was skipped without a network
    /// call. An `Err` means the vendor was called and failed.
    async fn attempt(&self, request: &SpeechRequest)
        -> Result<Option<SynthesizedAudio>, VoiceError>;
}

/// Turns a non-success response into [`VoiceError::Status`].
pub(crate) async fn ensure_success(
    provider: VoiceProvider,
    response: reqwest::Response,
) -> Result<reqwest::Response, VoiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(VoiceError::Status {
        provider,
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}
