//! Configuration loading, validation, and management for Parley.
//!
//! Loads configuration from `~/.parley/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use parley_core::message::DEFAULT_WELCOME_MESSAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI English tutor who helps learners improve their English through conversation.
You have access to special functions to help with English learning:
- translate_text: Translate between languages
- get_grammar_explanation: Get detailed grammar explanations
- get_vocabulary_examples: Get word definitions and examples
- get_pronunciation_guide: Get pronunciation help
- get_conversation_practice: Generate practice scenarios
- get_common_mistakes: Show common English mistakes
";

const DEFAULT_APOLOGY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again later.";

/// The root configuration structure.
///
/// Maps directly to `~/.parley/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion endpoint settings
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Tutor persona and chat limits
    #[serde(default)]
    pub chatbot: ChatbotConfig,

    /// Memory backend settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Speech output settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Chat history persistence
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("completion", &self.completion)
            .field("chatbot", &self.chatbot)
            .field("memory", &self.memory)
            .field("speech", &self.speech)
            .field("history", &self.history)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Advertise the tutor tools to the model
    #[serde(default = "default_true")]
    pub enable_tools: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    500
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_true() -> bool {
    true
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            enable_tools: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Seed message shown in an empty chat; never sent to the model
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Reply shown when a turn fails outright
    #[serde(default = "default_apology")]
    pub apology: String,

    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}
fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.into()
}
fn default_apology() -> String {
    DEFAULT_APOLOGY.into()
}
fn default_max_message_length() -> usize {
    1000
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            welcome_message: default_welcome_message(),
            apology: default_apology(),
            max_message_length: default_max_message_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the vector store
    #[serde(default = "default_memory_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// How many past turns to retrieve per query
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Answer straight from a memory hit instead of calling the model
    #[serde(default = "default_true")]
    pub short_circuit: bool,
}

fn default_memory_url() -> String {
    "http://localhost:8000".into()
}
fn default_collection() -> String {
    "conversations".into()
}
fn default_top_n() -> usize {
    3
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_memory_url(),
            collection: default_collection(),
            top_n: default_top_n(),
            short_circuit: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_unit")]
    pub rate: f32,

    #[serde(default = "default_unit")]
    pub pitch: f32,

    #[serde(default = "default_unit")]
    pub volume: f32,

    /// Speech generation server; without one only the platform voice is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,

    /// Per-request timeout for the speech generation server
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,

    /// Command that speaks text aloud (the platform voice)
    #[serde(default = "default_voice_command")]
    pub voice_command: String,

    /// Command that plays a WAV file
    #[serde(default = "default_player_command")]
    pub player_command: String,
}

fn default_lang() -> String {
    "en-US".into()
}
fn default_unit() -> f32 {
    1.0
}
fn default_model_timeout() -> u64 {
    60
}
fn default_voice_command() -> String {
    "espeak-ng".into()
}
fn default_player_command() -> String {
    "aplay".into()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            lang: default_lang(),
            rate: default_unit(),
            pitch: default_unit(),
            volume: default_unit(),
            model_url: None,
            model_timeout_secs: default_model_timeout(),
            voice_command: default_voice_command(),
            player_command: default_player_command(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Where the chat log is kept; defaults to `~/.parley/history.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl HistoryConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("history.json"))
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.parley/config.toml).
    ///
    /// Environment overrides:
    /// - `PARLEY_API_KEY`, then `OPENAI_API_KEY` (when no key is configured)
    /// - `PARLEY_BASE_URL`, `PARLEY_MODEL`, `PARLEY_MEMORY_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("PARLEY_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(url) = lookup("PARLEY_BASE_URL") {
            self.completion.base_url = url;
        }
        if let Some(model) = lookup("PARLEY_MODEL") {
            self.completion.model = model;
        }
        if let Some(url) = lookup("PARLEY_MEMORY_URL") {
            self.memory.url = url;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".parley")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(ConfigError::ValidationError(
                "completion.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.completion.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "completion.max_tokens must be > 0".into(),
            ));
        }
        if self.memory.top_n == 0 {
            return Err(ConfigError::ValidationError("memory.top_n must be > 0".into()));
        }
        if !(self.speech.rate > 0.0 && self.speech.rate <= 10.0) {
            return Err(ConfigError::ValidationError(
                "speech.rate must be in (0, 10]".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.speech.pitch) {
            return Err(ConfigError::ValidationError(
                "speech.pitch must be between 0.0 and 2.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.speech.volume) {
            return Err(ConfigError::ValidationError(
                "speech.volume must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            completion: CompletionConfig::default(),
            chatbot: ChatbotConfig::default(),
            memory: MemoryConfig::default(),
            speech: SpeechConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for parley_core::Error {
    fn from(err: ConfigError) -> Self {
        parley_core::Error::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert!((config.completion.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.completion.max_tokens, 500);
        assert!(config.memory.enabled);
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.lang, "en-US");
        assert_eq!(config.speech.model_timeout_secs, 60);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.completion.base_url, config.completion.base_url);
        assert_eq!(parsed.chatbot.system_prompt, config.chatbot.system_prompt);
        assert_eq!(parsed.memory.collection, config.memory.collection);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.completion.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_speech_volume_rejected() {
        let mut config = AppConfig::default();
        config.speech.volume = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("speech.volume"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        let config = result.unwrap();
        assert_eq!(config.memory.url, "http://localhost:8000");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[completion]
model = "gpt-4o"

[speech]
enabled = true
model_url = "http://localhost:5002"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.completion.model, "gpt-4o");
        assert_eq!(config.completion.max_tokens, 500);
        assert!(config.speech.enabled);
        assert_eq!(config.speech.model_url.as_deref(), Some("http://localhost:5002"));
        assert_eq!(config.speech.voice_command, "espeak-ng");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[completion\nmodel = ").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-openai"),
            ("PARLEY_MODEL", "gpt-4.1-mini"),
            ("PARLEY_MEMORY_URL", "http://chroma:8000"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(config.completion.model, "gpt-4.1-mini");
        assert_eq!(config.memory.url, "http://chroma:8000");
    }

    #[test]
    fn configured_key_wins_over_env() {
        let mut config = AppConfig {
            api_key: Some("sk-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(|k| (k == "PARLEY_API_KEY").then(|| "sk-env".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o-mini"));
        assert!(toml_str.contains("conversations"));
    }
}
