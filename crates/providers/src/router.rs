//! Provider selection: builds the model backend the config names.

use reactloop_core::error::ProviderError;
use reactloop_core::provider::Provider;
use std::sync::Arc;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured backend.
///
/// Every backend except a local Ollama needs an API key.
pub fn build_from_config(
    config: &reactloop_config::AppConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.provider.as_str();

    if !config.has_api_key() && name != "ollama" {
        return Err(ProviderError::NotConfigured(format!(
            "no API key for provider '{name}'; set GOOGLE_API_KEY (or REACTLOOP_API_KEY) \
             or add api_key to the config file"
        )));
    }
    let api_key = config.api_key.clone().unwrap_or_default();

    let base_url = match &config.api_url {
        Some(url) => url.clone(),
        None => default_base_url(name).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{name}'; set api_url to use a custom OpenAI-compatible endpoint"
            ))
        })?,
    };

    let provider = OpenAiCompatProvider::new(name, base_url, api_key);
    tracing::debug!(provider = name, base_url = provider.base_url(), "Built provider");
    Ok(Arc::new(provider))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "google" | "gemini" => "https://generativelanguage.googleapis.com/v1beta/openai",
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        _ => return None,
    };
    Some(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactloop_config::AppConfig;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("google").unwrap().contains("generativelanguage"));
        assert!(default_base_url("openai").unwrap().contains("api.openai.com"));
        assert!(default_base_url("ollama").unwrap().contains("localhost:11434"));
        assert!(default_base_url("mystery").is_none());
    }

    #[test]
    fn build_from_default_config_with_key() {
        let config = AppConfig {
            api_key: Some("key".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "google");
    }

    #[test]
    fn missing_key_is_not_configured() {
        let err = build_from_config(&AppConfig::default()).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn blank_key_is_not_configured() {
        let config = AppConfig {
            api_key: Some("   ".into()),
            ..AppConfig::default()
        };
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = AppConfig {
            provider: "ollama".into(),
            ..AppConfig::default()
        };
        assert!(build_from_config(&config).is_ok());
    }

    #[test]
    fn unknown_provider_needs_api_url() {
        let mut config = AppConfig {
            provider: "acme".into(),
            api_key: Some("key".into()),
            ..AppConfig::default()
        };
        assert!(build_from_config(&config).is_err());

        config.api_url = Some("http://localhost:9000/v1".into());
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "acme");
    }
}
