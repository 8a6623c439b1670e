//! Speech request and result definitions.
//!
//! A `SpeechRequest` is resolved against an ordered chain of
//! [`VoiceProvider`]s. The outcome is either encoded audio from the first
//! vendor that succeeded, or a fallback signal telling the caller to
//! synthesize speech locally.

use serde_json::Value;
use std::fmt;

use crate::fields::{self, RequestError};

/// Language code used when a request does not name one.
pub const DEFAULT_LANGUAGE_CODE: &str = "ta-IN";

/// Neutral speaking rate.
pub const DEFAULT_SPEAKING_RATE: f64 = 1.0;

/// Neutral pitch, in semitones.
pub const DEFAULT_PITCH: f64 = 0.0;

/// A validated speech synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    /// The text to speak. Never empty.
    pub text: String,
    /// BCP-47 locale, e.g. `ta-IN`.
    pub language_code: String,
    /// Speaking rate multiplier (1.0 is normal).
    pub speaking_rate: f64,
    /// Pitch shift in semitones (0.0 is normal).
    pub pitch: f64,
}

impl SpeechRequest {
    /// Creates a request with default locale, rate and pitch.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the text is empty or too large.
    pub fn new(text: impl Into<String>) -> Result<Self, RequestError> {
        let text = text.into();
        fields::check_text("text", &text)?;
        Ok(Self {
            text,
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            speaking_rate: DEFAULT_SPEAKING_RATE,
            pitch: DEFAULT_PITCH,
        })
    }

    /// Builds a request from `{ text, languageCode?, speakingRate?, pitch? }`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if `text` is missing, empty or not a string,
    /// or an optional field has the wrong type.
    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        let object = body.as_object().ok_or(RequestError::NotAnObject)?;
        let text = fields::required_string(object, "text")?;
        fields::check_text("text", &text)?;

        let language_code = fields::optional_string(object, "languageCode")?
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string());

        Ok(Self {
            text,
            language_code,
            speaking_rate: fields::optional_number(object, "speakingRate")?
                .unwrap_or(DEFAULT_SPEAKING_RATE),
            pitch: fields::optional_number(object, "pitch")?.unwrap_or(DEFAULT_PITCH),
        })
    }

    /// Sets the locale.
    pub fn with_language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }
}

/// Speech vendors in fixed priority order.
///
/// The derived ordering is the priority: lower variants are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VoiceProvider {
    ElevenLabs,
    GoogleCloudTts,
    AzureCognitiveServices,
    /// No server-side vendor; the caller synthesizes speech itself.
    ClientFallback,
}

impl VoiceProvider {
    /// All providers, highest priority first.
    pub const PRIORITY: [VoiceProvider; 4] = [
        VoiceProvider::ElevenLabs,
        VoiceProvider::GoogleCloudTts,
        VoiceProvider::AzureCognitiveServices,
        VoiceProvider::ClientFallback,
    ];

    /// Stable identifier used in logs and response headers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ElevenLabs => "elevenlabs",
            Self::GoogleCloudTts => "google",
            Self::AzureCognitiveServices => "azure",
            Self::ClientFallback => "client",
        }
    }
}

impl fmt::Display for VoiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded audio ready for a JSON response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    /// Vendor that produced the audio.
    pub provider: VoiceProvider,
    /// Standard base64 of the raw audio bytes. Never empty.
    pub base64_bytes: String,
    /// MIME type of the decoded bytes, e.g. `audio/mpeg`.
    pub mime_type: String,
}

/// Outcome of resolving a [`SpeechRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechResult {
    /// Some vendor returned audio.
    Audio(AudioPayload),
    /// No vendor produced audio; synthesize locally.
    Fallback,
}

impl SpeechResult {
    /// The provider that ended the chain.
    pub fn provider(&self) -> VoiceProvider {
        match self {
            Self::Audio(payload) => payload.provider,
            Self::Fallback => VoiceProvider::ClientFallback,
        }
    }

    /// Renders the wire body: `{ audioContent, mimeType }` or `{ fallback: true }`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Audio(payload) => serde_json::json!({
                "audioContent": payload.base64_bytes,
                "mimeType": payload.mime_type,
            }),
            Self::Fallback => serde_json::json!({ "fallback": true }),
        }
    }
}
