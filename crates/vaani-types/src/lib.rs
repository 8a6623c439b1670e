//! Shared request, event, and result types for the vaani services.
//!
//! This crate provides the data model used by the relay, the voice
//! resolver, and the HTTP server: validated request types built from JSON
//! bodies, the tagged [`StreamEvent`] pushed over the relay channel, and the
//! [`SpeechResult`] returned by the voice resolver.
//!
//! Every value here lives for exactly one request. Nothing is persisted.

mod fields;
pub mod voice;

use serde::Serialize;
use serde_json::Value;

pub use fields::RequestError;
pub use voice::{
    AudioPayload, SpeechRequest, SpeechResult, VoiceProvider, DEFAULT_LANGUAGE_CODE,
    DEFAULT_PITCH, DEFAULT_SPEAKING_RATE,
};

/// Maximum size of a user-supplied text field (64 KiB).
pub const MAX_TEXT_BYTES: usize = 64 * 1024;

/// A validated text-generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The user's message. Never empty.
    pub message: String,
    /// Language the answer should be written in (free-form, e.g. `"Tamil"`).
    pub language: Option<String>,
    /// Caller-supplied system preamble, replacing the configured default.
    pub system_preamble: Option<String>,
}

impl GenerationRequest {
    /// Creates a request carrying only a message.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the message is empty or too large.
    pub fn new(message: impl Into<String>) -> Result<Self, RequestError> {
        let message = message.into();
        fields::check_text("message", &message)?;
        Ok(Self {
            message,
            language: None,
            system_preamble: None,
        })
    }

    /// Builds a request from a relay body `{ message, language?, system? }`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the body is not an object, `message` is
    /// missing, empty or not a string, or an optional field has the wrong
    /// type.
    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        let object = body.as_object().ok_or(RequestError::NotAnObject)?;
        let message = fields::required_string(object, "message")?;
        fields::check_text("message", &message)?;

        Ok(Self {
            message,
            language: fields::optional_string(object, "language")?
                .filter(|value| !value.trim().is_empty()),
            system_preamble: fields::optional_string(object, "system")?
                .filter(|value| !value.trim().is_empty()),
        })
    }

    /// Sets the answer language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the system preamble.
    pub fn with_system_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.system_preamble = Some(preamble.into());
        self
    }

    /// Returns the system instruction sent upstream.
    ///
    /// The caller's preamble wins over `default_preamble`; a language
    /// directive is appended when a language was requested.
    pub fn system_instruction(&self, default_preamble: &str) -> String {
        let preamble = self
            .system_preamble
            .as_deref()
            .unwrap_or(default_preamble)
            .trim();

        match self.language.as_deref() {
            Some(language) if preamble.is_empty() => format!("Respond in {}.", language.trim()),
            Some(language) => format!("{}\n\nRespond in {}.", preamble, language.trim()),
            None => preamble.to_string(),
        }
    }
}

/// One event on the relay channel.
///
/// A relay execution yields zero or more [`StreamEvent::Token`] followed by
/// exactly one terminal event ([`StreamEvent::Done`] or
/// [`StreamEvent::Error`]). Serializes to the event's data payload:
/// `{"text": ...}` or `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    /// An incremental text delta, never the cumulative text.
    Token { text: String },
    /// Normal completion, carrying the full accumulated answer.
    Done { text: String },
    /// Generation failed; text already delivered via tokens is final.
    Error { message: String },
}

impl StreamEvent {
    /// The SSE event name for this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }

    /// Returns `true` for `Done` and `Error`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Token { .. })
    }
}
