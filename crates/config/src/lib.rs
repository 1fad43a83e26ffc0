//! Configuration loading and validation for reactloop.
//!
//! Loads configuration from `~/.reactloop/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use reactloop_core::agent::AgentConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.reactloop/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model backend: google, openai, openrouter, ollama
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per reasoning call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum reasoning calls per query
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Replaces the built-in ReAct system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_provider() -> String {
    "google".into()
}
fn default_model() -> String {
    "gemini-1.5-flash".into()
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_max_iterations() -> u32 {
    10
}

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
            .field("api_url", &self.api_url)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_iterations", &self.max_iterations)
            .field("system_prompt", &self.system_prompt)
            .field("tools", &self.tools)
            .finish()
    }
}

/// Which built-in tools the agent gets, and how they run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Built-in tool names, in the order they are offered to the model
    #[serde(default = "default_enabled_tools")]
    pub enabled: Vec<String>,

    /// Run one batch of tool calls concurrently
    #[serde(default)]
    pub parallel: bool,

    /// Per-call timeout; `None` means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_enabled_tools() -> Vec<String> {
    [
        "calculator",
        "add",
        "multiply",
        "web_search",
        "get_current_time",
        "get_weather",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_tools(),
            parallel: false,
            timeout_secs: None,
        }
    }
}

/// Environment variables searched for the API key, in priority order.
const API_KEY_VARS: [&str; 4] = [
    "REACTLOOP_API_KEY",
    "GOOGLE_API_KEY",
    "GEMINI_API_KEY",
    "OPENAI_API_KEY",
];

impl AppConfig {
    /// Load configuration from the default path (~/.reactloop/config.toml),
    /// then apply environment overrides.
    ///
    /// API key, first found wins:
    /// - `REACTLOOP_API_KEY`
    /// - `GOOGLE_API_KEY`
    /// - `GEMINI_API_KEY`
    /// - `OPENAI_API_KEY`
    ///
    /// `REACTLOOP_PROVIDER` and `REACTLOOP_MODEL` override the backend.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path, |key| std::env::var(key).ok())
    }

    /// Load from `path`, reading environment overrides through `env`.
    pub fn load_with_env(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if !config.has_api_key() {
            config.api_key = API_KEY_VARS
                .iter()
                .find_map(|key| env(key).filter(|v| !v.trim().is_empty()));
        }

        if let Some(provider) = env("REACTLOOP_PROVIDER") {
            config.provider = provider;
        }

        if let Some(model) = env("REACTLOOP_MODEL") {
            config.model = model;
        }

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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".reactloop")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be at least 1".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for name in &self.tools.enabled {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "tool '{}' is enabled more than once",
                    name
                )));
            }
        }

        if self.tools.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "tools.timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Whether a non-blank API key is set.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    /// The agent settings this configuration describes.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            system_prompt: self.system_prompt.clone(),
            max_iterations: self.max_iterations,
            parallel_tools: self.tools.parallel,
        }
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_iterations: default_max_iterations(),
            system_prompt: None,
            tools: ToolsConfig::default(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, "google");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.tools.enabled.len(), 6);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.tools.enabled, config.tools.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
model = "gemini-1.5-pro"
max_iterations = 4

[tools]
enabled = ["calculator", "get_weather"]
parallel = true
timeout_secs = 30
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.provider, "google");
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.tools.enabled, vec!["calculator", "get_weather"]);
        assert!(config.tools.parallel);
        assert_eq!(config.tools.timeout_secs, Some(30));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = 3.5\n").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn duplicate_enabled_tool_rejected() {
        let mut config = AppConfig::default();
        config.tools.enabled = vec!["add".into(), "add".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iterations_rejected() {
        let config = AppConfig {
            max_iterations: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "google");
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GEMINI_API_KEY", "gem-key"),
            ("OPENAI_API_KEY", "oa-key"),
            ("REACTLOOP_MODEL", "gemini-2.0-flash"),
        ]);
        let config = AppConfig::load_with_env(Path::new("/nonexistent/config.toml"), |k| {
            env.get(k).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("gem-key"));
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.provider, "google");
    }

    #[test]
    fn file_api_key_wins_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"from-file\"\n").unwrap();
        let config =
            AppConfig::load_with_env(&path, |_| Some("from-env".to_string())).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn no_credentials_anywhere() {
        let config =
            AppConfig::load_with_env(Path::new("/nonexistent/config.toml"), no_env).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn blank_file_key_falls_back_to_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"  \"\n").unwrap();
        let config = AppConfig::load_with_env(&path, |key| {
            (key == "GEMINI_API_KEY").then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert!(config.has_api_key());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret-value".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn agent_config_carries_settings() {
        let config = AppConfig {
            max_iterations: 3,
            system_prompt: Some("Be brief.".into()),
            ..AppConfig::default()
        };
        let agent = config.agent_config();
        assert_eq!(agent.max_iterations, 3);
        assert_eq!(agent.max_tokens, Some(2048));
        assert_eq!(agent.system_prompt.as_deref(), Some("Be brief."));
        assert!(agent.validate().is_ok());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gemini-1.5-flash"));
        assert!(toml_str.contains("[tools]"));
    }
}
