use crate::config::GoogleTtsConfig;
use crate::error::VoiceError;
use crate::provider::{ensure_success, SpeechProvider, SynthesizedAudio};
use crate::voices::GOOGLE_VOICES;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use vaani_types::{SpeechRequest, VoiceProvider};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

/// Google Cloud Text-to-Speech, keyed by API key.
#[derive(Debug, Clone)]
pub struct GoogleTtsProvider {
    client: reqwest::Client,
    config: GoogleTtsConfig,
}

impl GoogleTtsProvider {
    pub fn new(client: reqwest::Client, config: GoogleTtsConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/text:synthesize",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(request: &SpeechRequest) -> Value {
        let voice = GOOGLE_VOICES.select(&request.language_code);
        json!({
            "input": { "text": request.text },
            "voice": { "languageCode": voice.language_code, "name": voice.name },
            "audioConfig": {
                "audioEncoding": "MP3",
                "speakingRate": request.speaking_rate.clamp(0.25, 4.0),
                "pitch": request.pitch.clamp(-20.0, 20.0),
            },
        })
    }

    fn decode_audio(&self, response: SynthesizeResponse) -> Result<SynthesizedAudio, VoiceError> {
        let encoded = response.audio_content.ok_or_else(|| VoiceError::InvalidAudio {
            provider: self.kind(),
            reason: "response has no audioContent".to_string(),
        })?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| VoiceError::InvalidAudio {
                provider: self.kind(),
                reason: format!("audioContent is not base64: {}", e),
            })?;
        SynthesizedAudio::mpeg(self.kind(), bytes)
    }
}

#[async_trait]
impl SpeechProvider for GoogleTtsProvider {
    fn kind(&self) -> VoiceProvider {
        VoiceProvider::GoogleCloudTts
    }

    async fn attempt(
        &self,
        request: &SpeechRequest,
    ) -> Result<Option<SynthesizedAudio>, VoiceError> {
        let Some(api_key) = self.config.api_key() else {
            return Ok(None);
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;
        let response = ensure_success(self.kind(), response).await?;
        let body: SynthesizeResponse = response.json().await?;

        self.decode_audio(body).map(Some)
    }
}
