use crate::config::ElevenLabsConfig;
use crate::error::VoiceError;
use crate::provider::{ensure_success, SpeechProvider, SynthesizedAudio};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::{json, Value};
use vaani_types::{SpeechRequest, VoiceProvider};

const OUTPUT_FORMAT: &str = "mp3_44100_128";
const STABILITY: f64 = 0.5;
const SIMILARITY_BOOST: f64 = 0.75;
const MIN_SPEED: f64 = 0.7;
const MAX_SPEED: f64 = 1.2;

/// ElevenLabs text-to-speech. Needs an API key and a voice for the locale.
#[derive(Debug, Clone)]
pub struct ElevenLabsProvider {
    client: reqwest::Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsProvider {
    pub fn new(client: reqwest::Client, config: ElevenLabsConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice_id
        )
    }

    fn request_body(&self, request: &SpeechRequest) -> Value {
        json!({
            "text": request.text,
            "model_id": self.config.model_id,
            "voice_settings": {
                "stability": STABILITY,
                "similarity_boost": SIMILARITY_BOOST,
                "speed": request.speaking_rate.clamp(MIN_SPEED, MAX_SPEED),
            },
        })
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    fn kind(&self) -> VoiceProvider {
        VoiceProvider::ElevenLabs
    }

    async fn attempt(
        &self,
        request: &SpeechRequest,
    ) -> Result<Option<SynthesizedAudio>, VoiceError> {
        let Some(api_key) = self.config.api_key() else {
            return Ok(None);
        };
        let Some(voice_id) = self.config.voice_id_for(&request.language_code) else {
            return Ok(None);
        };

        let response = self
            .client
            .post(self.endpoint(voice_id))
            .query(&[("output_format", OUTPUT_FORMAT)])
            .header("xi-api-key", api_key)
            .header(ACCEPT, "audio/mpeg")
            .json(&self.request_body(request))
            .send()
            .await?;
        let response = ensure_success(self.kind(), response).await?;
        let bytes = response.bytes().await?;

        SynthesizedAudio::mpeg(self.kind(), bytes.to_vec()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(api_key: Option<&str>, voice: Option<&str>) -> ElevenLabsProvider {
        ElevenLabsProvider::new(
            reqwest::Client::new(),
            ElevenLabsConfig {
                api_key: api_key.map(str::to_string),
                default_voice_id: voice.map(str::to_string),
                ..Default::default()
            },
        )
    }

    #[test]
    fn body_clamps_speed_and_sets_voice_settings() {
        let provider = provider(Some("k"), Some("v"));
        let mut request = SpeechRequest::new("hello").unwrap();
        request.speaking_rate = 3.0;
        let body = provider.request_body(&request);
        assert_eq!(body["text"], "hello");
        assert_eq!(body["model_id"], "eleven_multilingual_v2");
        assert_eq!(body["voice_settings"]["speed"], 1.2);
        assert_eq!(body["voice_settings"]["stability"], 0.5);
        assert_eq!(body["voice_settings"]["similarity_boost"], 0.75);

        request.speaking_rate = 0.1;
        assert_eq!(provider.request_body(&request)["voice_settings"]["speed"], 0.7);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let mut provider = provider(Some("k"), Some("v"));
        provider.config.base_url = "http://localhost:9/".to_string();
        assert_eq!(
            provider.endpoint("voice-1"),
            "http://localhost:9/v1/text-to-speech/voice-1"
        );
    }

    #[tokio::test]
    async fn skipped_without_key_or_voice() {
        let request = SpeechRequest::new("hello").unwrap();
        assert!(provider(None, Some("v")).attempt(&request).await.unwrap().is_none());
        assert!(provider(Some("k"), None).attempt(&request).await.unwrap().is_none());
    }
}
