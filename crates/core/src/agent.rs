//! Agent configuration and per-run state types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::message::{Message, MessageLog};

/// Configuration for the agent's behavior.
///
/// Passed explicitly to the agent at construction; the loop never reads
/// process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model to use
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temp")]
    pub temperature: f32,

    /// Max tokens per reasoning call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// System prompt override. `None` uses the built-in ReAct prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Maximum reasoning calls per query (safety limit)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Run the tool calls of one batch concurrently. Results keep request order.
    #[serde(default)]
    pub parallel_tools: bool,
}

fn default_temp() -> f32 {
    0.1
}
fn default_max_iterations() -> u32 {
    10
}

impl AgentConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Check the settings the loop relies on.
    pub fn validate(&self) -> Result<(), Error> {
        if self.model.trim().is_empty() {
            return Err(Error::config("model must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::config("temperature must be between 0.0 and 2.0"));
        }
        if self.max_iterations == 0 {
            return Err(Error::config("max_iterations must be at least 1"));
        }
        if let Some(prompt) = &self.system_prompt
            && prompt.trim().is_empty()
        {
            return Err(Error::config("system_prompt override must not be blank"));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".into(),
            temperature: default_temp(),
            max_tokens: None,
            system_prompt: None,
            max_iterations: default_max_iterations(),
            parallel_tools: false,
        }
    }
}

/// State of one agent run: the Message Log plus the iteration counter.
///
/// Created fresh for every query and owned by exactly one control loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    /// Correlation ID for logs; not part of the Message Log
    pub run_id: String,

    /// The ordered Message Log
    pub log: MessageLog,

    /// Reasoning calls made so far
    pub iterations: u32,
}

impl AgentState {
    /// Start a run seeded with the user's query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            log: MessageLog::with_query(query),
            iterations: 0,
        }
    }

    pub fn append(&mut self, message: Message) {
        self.log.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_iterations, 10);
        assert!(!config.parallel_tools);
    }

    #[test]
    fn invalid_settings_rejected() {
        let bad_temp = AgentConfig {
            temperature: 5.0,
            ..AgentConfig::default()
        };
        assert!(bad_temp.validate().is_err());

        let no_iterations = AgentConfig {
            max_iterations: 0,
            ..AgentConfig::default()
        };
        assert!(no_iterations.validate().is_err());

        assert!(AgentConfig::new("  ").validate().is_err());

        let blank_prompt = AgentConfig {
            system_prompt: Some("".into()),
            ..AgentConfig::default()
        };
        assert!(blank_prompt.validate().is_err());
    }

    #[test]
    fn agent_state_starts_with_query() {
        let state = AgentState::new("What is 25 * 4?");
        assert_eq!(state.iterations, 0);
        assert_eq!(state.log.len(), 1);
        assert_eq!(state.log.messages()[0], Message::user_query("What is 25 * 4?"));
    }

    #[test]
    fn run_ids_are_distinct() {
        assert_ne!(AgentState::new("a").run_id, AgentState::new("a").run_id);
    }
}
