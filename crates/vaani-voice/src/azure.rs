use crate::config::AzureSpeechConfig;
use crate::error::VoiceError;
use crate::provider::{ensure_success, SpeechProvider, SynthesizedAudio};
use crate::ssml::build_ssml;
use crate::voices::AZURE_VOICES;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use vaani_types::{SpeechRequest, VoiceProvider};

const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Azure Cognitive Services Speech. Needs a subscription key and a region.
#[derive(Debug, Clone)]
pub struct AzureSpeechProvider {
    client: reqwest::Client,
    config: AzureSpeechConfig,
}

impl AzureSpeechProvider {
    pub fn new(client: reqwest::Client, config: AzureSpeechConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SpeechProvider for AzureSpeechProvider {
    fn kind(&self) -> VoiceProvider {
        VoiceProvider::AzureCognitiveServices
    }

    async fn attempt(
        &self,
        request: &SpeechRequest,
    ) -> Result<Option<SynthesizedAudio>, VoiceError> {
        let Some(key) = self.config.subscription_key() else {
            return Ok(None);
        };
        if self.config.region().is_none() {
            return Ok(None);
        }
        let endpoint = self.config.endpoint()?;

        let voice = AZURE_VOICES.select(&request.language_code);
        let ssml = build_ssml(voice, &request.text, request.speaking_rate, request.pitch);

        let response = self
            .client
            .post(endpoint)
            .header("Ocp-Apim-Subscription-Key", key)
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header(USER_AGENT, concat!("vaani/", env!("CARGO_PKG_VERSION")))
            .body(ssml)
            .send()
            .await?;
        let response = ensure_success(self.kind(), response).await?;
        let bytes = response.bytes().await?;

        SynthesizedAudio::mpeg(self.kind(), bytes.to_vec()).map(Some)
    }
}
