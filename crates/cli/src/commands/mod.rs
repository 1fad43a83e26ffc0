pub mod demo;
pub mod init;
pub mod interactive;
pub mod query;
pub mod render;
pub mod run_log;

use std::sync::Arc;
use std::time::Duration;

use reactloop_agent::Agent;
use reactloop_config::AppConfig;
use reactloop_core::error::{ProviderError, ToolError};
use reactloop_core::tool::ToolRegistry;
use tracing::info;

/// Build the agent the configuration describes.
///
/// Prints setup help and fails when no credential is available.
pub fn build_agent(config: &AppConfig) -> Result<Agent, Box<dyn std::error::Error>> {
    let provider = match reactloop_providers::build_from_config(config) {
        Ok(provider) => provider,
        Err(ProviderError::NotConfigured(reason)) => {
            print_missing_key_help(&reason);
            return Err(format!("Provider not configured: {reason}").into());
        }
        Err(e) => return Err(e.into()),
    };

    let tools = build_tools(config)?;

    let agent = Agent::builder()
        .provider(provider)
        .shared_tools(Arc::new(tools))
        .config(config.agent_config())
        .build()?;
    info!(
        provider = agent.provider_name(),
        model = %config.model,
        tools = agent.tools().len(),
        "Agent ready"
    );
    Ok(agent)
}

/// The enabled built-in tools, with the configured per-call timeout.
pub fn build_tools(config: &AppConfig) -> Result<ToolRegistry, ToolError> {
    let tools = reactloop_tools::registry_with(&config.tools.enabled)?;
    Ok(match config.tools.timeout_secs {
        Some(secs) => tools.with_timeout(Duration::from_secs(secs)),
        None => tools,
    })
}

fn print_missing_key_help(reason: &str) {
    eprintln!("❌ Error: {reason}");
    eprintln!();
    eprintln!("Set your API key using one of these methods:");
    eprintln!("  1. Environment variable: export GOOGLE_API_KEY='your-key'");
    eprintln!("  2. Command line: reactloop --api-key 'your-key'");
    eprintln!(
        "  3. Config file: api_key = \"...\" in {}",
        AppConfig::config_dir().join("config.toml").display()
    );
    eprintln!();
    eprintln!("Get a free Gemini API key at: https://aistudio.google.com/app/apikey");
    eprintln!("Or use a local model: reactloop --provider ollama --model llama3.2");
}
