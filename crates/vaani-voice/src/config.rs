use crate::error::VoiceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_GOOGLE_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com";

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_elevenlabs_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_elevenlabs_base_url() -> String {
    DEFAULT_ELEVENLABS_BASE_URL.to_string()
}

fn default_google_base_url() -> String {
    DEFAULT_GOOGLE_TTS_BASE_URL.to_string()
}

/// Returns `value` unless it is missing or blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Canonical form used to compare locale keys: `TA_in` and `ta-IN` match.
pub fn normalize_locale(code: &str) -> String {
    code.trim().replace('_', "-").to_ascii_lowercase()
}

/// Credentials and tuning for every voice vendor. Each vendor is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,
    #[serde(default)]
    pub google: GoogleTtsConfig,
    #[serde(default)]
    pub azure: AzureSpeechConfig,
    /// Upper bound on a single vendor call, connect through last byte.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            elevenlabs: ElevenLabsConfig::default(),
            google: GoogleTtsConfig::default(),
            azure: AzureSpeechConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl VoiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Voice used when no per-locale override matches.
    #[serde(default)]
    pub default_voice_id: Option<String>,
    /// Per-locale voice overrides, keyed by language code (e.g. `ta-IN`).
    /// Sorted so that keys normalizing to the same locale resolve the same
    /// way on every lookup.
    #[serde(default)]
    pub voice_ids: BTreeMap<String, String>,
    #[serde(default = "default_elevenlabs_model")]
    pub model_id: String,
    #[serde(default = "default_elevenlabs_base_url")]
    pub base_url: String,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_voice_id: None,
            voice_ids: BTreeMap::new(),
            model_id: default_elevenlabs_model(),
            base_url: default_elevenlabs_base_url(),
        }
    }
}

impl fmt::Debug for ElevenLabsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevenLabsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_voice_id", &self.default_voice_id)
            .field("voice_ids", &self.voice_ids)
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ElevenLabsConfig {
    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    /// Resolves the voice for `language_code`: an exact key, then the first
    /// key (in sorted order) with the same normalized locale, then the
    /// default voice.
    pub fn voice_id_for(&self, language_code: &str) -> Option<&str> {
        let wanted = normalize_locale(language_code);
        self.voice_ids
            .get(language_code.trim())
            .or_else(|| {
                self.voice_ids
                    .iter()
                    .find(|(locale, _)| normalize_locale(locale) == wanted)
                    .map(|(_, voice)| voice)
            })
            .map(|voice| voice.trim())
            .filter(|voice| !voice.is_empty())
            .or_else(|| present(&self.default_voice_id))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleTtsConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_google_base_url")]
    pub base_url: String,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_google_base_url(),
        }
    }
}

impl fmt::Debug for GoogleTtsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTtsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleTtsConfig {
    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AzureSpeechConfig {
    #[serde(default, skip_serializing)]
    pub subscription_key: Option<String>,
    /// Azure region, e.g. `centralindia`.
    #[serde(default)]
    pub region: Option<String>,
    /// Full synthesis URL, replacing the one derived from `region`.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl fmt::Debug for AzureSpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSpeechConfig")
            .field(
                "subscription_key",
                &self.subscription_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AzureSpeechConfig {
    pub fn subscription_key(&self) -> Option<&str> {
        present(&self.subscription_key)
    }

    pub fn region(&self) -> Option<&str> {
        present(&self.region)
    }

    /// Both a key and a region are required.
    pub fn is_configured(&self) -> bool {
        self.subscription_key().is_some() && self.region().is_some()
    }

    /// Synthesis URL for the configured region.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Config`] if no region is set or the region is
    /// not a plain identifier.
    pub fn endpoint(&self) -> Result<String, VoiceError> {
        if let Some(endpoint) = present(&self.endpoint) {
            return Ok(endpoint.to_string());
        }
        let region = self
            .region()
            .ok_or_else(|| VoiceError::Config("azure region is not set".to_string()))?;
        if !region.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(VoiceError::Config(format!(
                "azure region must be alphanumeric, got {:?}",
                region
            )));
        }
        Ok(format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            region.to_ascii_lowercase()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elevenlabs(default: Option<&str>, overrides: &[(&str, &str)]) -> ElevenLabsConfig {
        ElevenLabsConfig {
            api_key: Some("key".into()),
            default_voice_id: default.map(str::to_string),
            voice_ids: overrides
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn elevenlabs_locale_override_beats_default() {
        let config = elevenlabs(Some("default-voice"), &[("ta-IN", "tamil-voice")]);
        assert_eq!(config.voice_id_for("ta-IN"), Some("tamil-voice"));
        assert_eq!(config.voice_id_for("hi-IN"), Some("default-voice"));
    }

    #[test]
    fn elevenlabs_locale_match_ignores_case_and_separator() {
        let config = elevenlabs(None, &[("TA_IN", "tamil-voice")]);
        assert_eq!(config.voice_id_for("ta-IN"), Some("tamil-voice"));
    }

    #[test]
    fn elevenlabs_colliding_locale_keys_resolve_deterministically() {
        let config = elevenlabs(None, &[("ta-IN", "hyphen"), ("TA_IN", "underscore")]);
        assert_eq!(config.voice_id_for("ta-IN"), Some("hyphen"));
        assert_eq!(config.voice_id_for("TA_IN"), Some("underscore"));
        // No exact key: the first sorted key wins, and "TA_IN" < "ta-IN".
        for _ in 0..8 {
            assert_eq!(config.voice_id_for("ta_in"), Some("underscore"));
        }
    }

    #[test]
    fn elevenlabs_without_any_voice_resolves_nothing() {
        let config = elevenlabs(Some("  "), &[]);
        assert_eq!(config.voice_id_for("ta-IN"), None);
    }

    #[test]
    fn azure_requires_key_and_region() {
        let mut config = AzureSpeechConfig {
            subscription_key: Some("key".into()),
            ..Default::default()
        };
        assert!(!config.is_configured());
        config.region = Some("centralindia".into());
        assert!(config.is_configured());
        assert_eq!(
            config.endpoint().unwrap(),
            "https://centralindia.tts.speech.microsoft.com/cognitiveservices/v1"
        );
    }

    #[test]
    fn azure_rejects_region_with_path_characters() {
        let config = AzureSpeechConfig {
            subscription_key: Some("key".into()),
            region: Some("evil.example/x".into()),
            endpoint: None,
        };
        assert!(matches!(config.endpoint(), Err(VoiceError::Config(_))));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = VoiceConfig {
            elevenlabs: elevenlabs(Some("v"), &[]),
            google: GoogleTtsConfig {
                api_key: Some("google-secret".into()),
                ..Default::default()
            },
            azure: AzureSpeechConfig {
                subscription_key: Some("azure-secret".into()),
                region: Some("eastus".into()),
                endpoint: None,
            },
            request_timeout_secs: 5,
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("google-secret"));
        assert!(!rendered.contains("azure-secret"));
        assert!(rendered.contains("eastus"));
    }

    #[test]
    fn voice_config_parses_from_toml_with_defaults() {
        let config: VoiceConfig = toml::from_str(
            r#"
            [elevenlabs]
            api_key = "k"
            default_voice_id = "v"

            [elevenlabs.voice_ids]
            "ta-IN" = "tamil"
            "#,
        )
        .unwrap();
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.elevenlabs.model_id, "eleven_multilingual_v2");
        assert_eq!(config.elevenlabs.voice_id_for("ta-IN"), Some("tamil"));
        assert_eq!(config.google.base_url, DEFAULT_GOOGLE_TTS_BASE_URL);
        assert!(!config.azure.is_configured());
    }
}
