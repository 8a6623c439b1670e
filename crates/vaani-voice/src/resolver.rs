use crate::azure::AzureSpeechProvider;
use crate::config::VoiceConfig;
use crate::elevenlabs::ElevenLabsProvider;
use crate::error::VoiceError;
use crate::google::GoogleTtsProvider;
use crate::provider::SpeechProvider;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::time::Instant;
use tracing::{debug, info, warn};
use vaani_types::{AudioPayload, SpeechRequest, SpeechResult, VoiceProvider};

/// Walks the vendor chain in priority order and returns the first audio.
pub struct SpeechResolver {
    providers: Vec<Box<dyn SpeechProvider>>,
}

impl std::fmt::Debug for SpeechResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.kind()))
            .finish()
    }
}

impl SpeechResolver {
    /// Providers are ordered by [`VoiceProvider`] priority regardless of the
    /// order they are passed in.
    pub fn new(mut providers: Vec<Box<dyn SpeechProvider>>) -> Self {
        providers.sort_by_key(|p| p.kind());
        Self { providers }
    }

    /// The standard ElevenLabs, Google, Azure chain sharing one HTTP client
    /// whose total timeout is `config.request_timeout()`.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &VoiceConfig) -> Result<Self, VoiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::new(vec![
            Box::new(ElevenLabsProvider::new(
                client.clone(),
                config.elevenlabs.clone(),
            )),
            Box::new(GoogleTtsProvider::new(client.clone(), config.google.clone())),
            Box::new(AzureSpeechProvider::new(client, config.azure.clone())),
        ]))
    }

    pub fn providers(&self) -> impl Iterator<Item = VoiceProvider> + '_ {
        self.providers.iter().map(|p| p.kind())
    }

    /// Tries each provider at most once. Vendor failures are logged and the
    /// chain moves on; if nothing produces audio the result is
    /// [`SpeechResult::Fallback`].
    pub async fn resolve(&self, request: &SpeechRequest) -> SpeechResult {
        for provider in &self.providers {
            let kind = provider.kind();
            let started = Instant::now();
            match provider.attempt(request).await {
                Ok(Some(audio)) => {
                    info!(
                        provider = %kind,
                        outcome = "success",
                        bytes = audio.bytes.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "speech synthesized"
                    );
                    return SpeechResult::Audio(AudioPayload {
                        provider: kind,
                        base64_bytes: STANDARD.encode(&audio.bytes),
                        mime_type: audio.mime_type,
                    });
                }
                Ok(None) => {
                    debug!(provider = %kind, outcome = "skipped", "provider not configured");
                }
                Err(e) => {
                    warn!(
                        provider = %kind,
                        outcome = "failed",
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "speech provider failed, trying next"
                    );
                }
            }
        }

        info!(
            provider = %VoiceProvider::ClientFallback,
            outcome = "fallback",
            "no provider produced audio"
        );
        SpeechResult::Fallback
    }
}
