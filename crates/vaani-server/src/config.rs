//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use vaani_relay::GenerationConfig;
use vaani_voice::VoiceConfig;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream text generation used by the relay.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Speech vendors used by the resolver.
    #[serde(default)]
    pub voice: VoiceConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vaani_relay=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Prefix of per-locale ElevenLabs voice overrides, e.g.
/// `ELEVENLABS_VOICE_ID_TA_IN`.
const ELEVENLABS_VOICE_PREFIX: &str = "ELEVENLABS_VOICE_ID_";

/// `TA_IN` becomes `ta-IN`.
fn locale_from_env_suffix(suffix: &str) -> Option<String> {
    let mut parts = suffix.split('_').filter(|p| !p.is_empty());
    let language = parts.next()?.to_ascii_lowercase();
    match parts.next() {
        Some(region) => Some(format!("{}-{}", language, region.to_ascii_uppercase())),
        None => Some(language),
    }
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies overrides from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, std::env::vars());
    Ok(config)
}

/// Environment variable overrides:
/// - `VAANI_HOST`, `VAANI_PORT` override `server.host` / `server.port`
/// - `VAANI_LOG_LEVEL`, `VAANI_LOG_JSON` ("true" or "1") override `logging`
/// - `GEMINI_API_KEY`, `GEMINI_MODEL` override `generation`
/// - `ELEVENLABS_API_KEY`, `ELEVENLABS_VOICE_ID` and
///   `ELEVENLABS_VOICE_ID_<LOCALE>` override `voice.elevenlabs`
/// - `GOOGLE_TTS_API_KEY` overrides `voice.google.api_key`
/// - `AZURE_SPEECH_KEY`, `AZURE_SPEECH_REGION` override `voice.azure`
///
/// Unparseable host or port values are ignored.
pub fn apply_env_overrides(config: &mut Config, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, value) in vars {
        match key.as_str() {
            "VAANI_HOST" => {
                if let Ok(parsed) = value.parse() {
                    config.server.host = parsed;
                }
            }
            "VAANI_PORT" => {
                if let Ok(parsed) = value.parse() {
                    config.server.port = parsed;
                }
            }
            "VAANI_LOG_LEVEL" => config.logging.level = value,
            "VAANI_LOG_JSON" => config.logging.json = value == "true" || value == "1",
            "GEMINI_API_KEY" => config.generation.api_key = Some(value),
            "GEMINI_MODEL" => config.generation.model = value,
            "ELEVENLABS_API_KEY" => config.voice.elevenlabs.api_key = Some(value),
            "ELEVENLABS_VOICE_ID" => config.voice.elevenlabs.default_voice_id = Some(value),
            "GOOGLE_TTS_API_KEY" => config.voice.google.api_key = Some(value),
            "AZURE_SPEECH_KEY" => config.voice.azure.subscription_key = Some(value),
            "AZURE_SPEECH_REGION" => config.voice.azure.region = Some(value),
            other => {
                if let Some(locale) = other
                    .strip_prefix(ELEVENLABS_VOICE_PREFIX)
                    .and_then(locale_from_env_suffix)
                {
                    config.voice.elevenlabs.voice_ids.insert(locale, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.voice.request_timeout_secs, 20);
        assert_eq!(config.generation.idle_timeout_secs, 60);
    }

    #[test]
    fn file_values_are_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [logging]
            level = "debug"
            json = true

            [generation]
            model = "gemini-test"
            idle_timeout_secs = 5

            [voice]
            request_timeout_secs = 7

            [voice.google]
            base_url = "http://localhost:9999"

            [voice.azure]
            region = "centralindia"
            "#
        )
        .unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.logging.json);
        assert_eq!(config.generation.model, "gemini-test");
        assert_eq!(config.generation.idle_timeout_secs, 5);
        assert_eq!(config.voice.request_timeout_secs, 7);
        assert_eq!(config.voice.google.base_url, "http://localhost:9999");
        assert_eq!(config.voice.azure.region.as_deref(), Some("centralindia"));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            load_config(file.path().to_str()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_populate_vendor_credentials() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            vars(&[
                ("GEMINI_API_KEY", "gemini"),
                ("GEMINI_MODEL", "gemini-pro"),
                ("ELEVENLABS_API_KEY", "eleven"),
                ("ELEVENLABS_VOICE_ID", "default-voice"),
                ("ELEVENLABS_VOICE_ID_TA_IN", "tamil-voice"),
                ("GOOGLE_TTS_API_KEY", "google"),
                ("AZURE_SPEECH_KEY", "azure"),
                ("AZURE_SPEECH_REGION", "eastus"),
            ]),
        );

        assert!(config.generation.is_configured());
        assert_eq!(config.generation.model, "gemini-pro");
        assert_eq!(config.voice.elevenlabs.api_key(), Some("eleven"));
        assert_eq!(
            config.voice.elevenlabs.voice_id_for("ta-IN"),
            Some("tamil-voice")
        );
        assert_eq!(
            config.voice.elevenlabs.voice_id_for("hi-IN"),
            Some("default-voice")
        );
        assert_eq!(config.voice.google.api_key(), Some("google"));
        assert!(config.voice.azure.is_configured());
    }

    #[test]
    fn env_overrides_server_and_logging() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            vars(&[
                ("VAANI_HOST", "0.0.0.0"),
                ("VAANI_PORT", "not-a-port"),
                ("VAANI_LOG_LEVEL", "debug"),
                ("VAANI_LOG_JSON", "1"),
                ("UNRELATED", "x"),
            ]),
        );
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn locale_suffix_is_normalized() {
        assert_eq!(locale_from_env_suffix("TA_IN").as_deref(), Some("ta-IN"));
        assert_eq!(locale_from_env_suffix("hi").as_deref(), Some("hi"));
        assert_eq!(locale_from_env_suffix(""), None);
    }
}
