//! Voice synthesis resolver for the vaani server.
//!
//! Turns a [`SpeechRequest`] into audio by trying hosted text-to-speech
//! vendors in a fixed priority order and stopping at the first success:
//!
//! 1. ElevenLabs (API key plus a voice id resolved for the request's locale)
//! 2. Google Cloud Text-to-Speech (API key)
//! 3. Azure Cognitive Services Speech (subscription key plus region)
//!
//! Vendor failures never surface as errors. When every configured vendor
//! fails, or none is configured, the resolver returns
//! [`SpeechResult::Fallback`] and the caller synthesizes speech locally.
//!
//! [`SpeechRequest`]: vaani_types::SpeechRequest
//! [`SpeechResult::Fallback`]: vaani_types::SpeechResult::Fallback

pub mod azure;
pub mod config;
pub mod elevenlabs;
pub mod error;
pub mod google;
pub mod provider;
pub mod resolver;
pub mod ssml;
pub mod voices;

pub use azure::AzureSpeechProvider;
pub use config::{AzureSpeechConfig, ElevenLabsConfig, GoogleTtsConfig, VoiceConfig};
pub use elevenlabs::ElevenLabsProvider;
pub use error::VoiceError;
pub use google::GoogleTtsProvider;
pub use provider::{SpeechProvider, SynthesizedAudio};
pub use resolver::SpeechResolver;
