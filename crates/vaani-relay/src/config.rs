use crate::relay::RelayOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_preamble() -> String {
    "You are a helpful assistant. Answer clearly and concisely.".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    60
}

/// Upstream generation settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Gemini API key. Without it the relay refuses to open a stream.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// System preamble used when the caller does not supply one.
    #[serde(default = "default_preamble")]
    pub default_preamble: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    /// Longest wait for the next upstream chunk before the relay gives up.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            default_preamble: default_preamble(),
            temperature: None,
            max_output_tokens: None,
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("default_preamble", &self.default_preamble)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .finish()
    }
}

impl GenerationConfig {
    /// Returns the API key if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Idle timeout as a duration; zero is raised to one second.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs.max(1))
    }
}

impl From<&GenerationConfig> for RelayOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            idle_timeout: config.idle_timeout(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_options_follow_idle_timeout() {
        let config = GenerationConfig {
            idle_timeout_secs: 7,
            ..Default::default()
        };
        let options = RelayOptions::from(&config);
        assert_eq!(options.idle_timeout, Duration::from_secs(7));
        assert_eq!(
            options.channel_capacity,
            crate::relay::DEFAULT_CHANNEL_CAPACITY
        );

        let zero = GenerationConfig {
            idle_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(RelayOptions::from(&zero).idle_timeout, Duration::from_secs(1));
    }

    #[test]
    fn blank_key_is_not_configured() {
        let config = GenerationConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn debug_redacts_key() {
        let config = GenerationConfig {
            api_key: Some("secret-key".into()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
