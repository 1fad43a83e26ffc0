//! The agent facade: configuration, tools and backend behind two calls.
//!
//! ```ignore
//! let agent = Agent::builder()
//!     .provider(provider)
//!     .tools(reactloop_tools::default_registry())
//!     .max_iterations(5)
//!     .build()?;
//!
//! let run = agent.invoke("What is 25 multiplied by 4, then add 50?").await?;
//! println!("{}", run.answer_text());
//! ```

use reactloop_core::agent::{AgentConfig, AgentState};
use reactloop_core::error::{Error, Result};
use reactloop_core::provider::Provider;
use reactloop_core::tool::ToolRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::control::{ControlLoop, LoopState, StepStream};
use crate::execution::ToolExecutor;
use crate::outcome::AgentRun;
use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use crate::reasoning::ReasoningStep;

/// A configured agent. Cheap to share; every query gets its own state.
#[derive(Clone)]
pub struct Agent {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    config: Arc<AgentConfig>,
    system_prompt: Arc<str>,
}

impl Agent {
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The system prompt actually sent to the backend.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Mermaid diagram of the control loop with this agent's tools.
    pub fn graph_mermaid(&self) -> String {
        graph_mermaid(&self.tools)
    }

    /// Run `query` to completion.
    pub async fn invoke(&self, query: &str) -> Result<AgentRun> {
        self.invoke_with_cancel(query, CancellationToken::new()).await
    }

    /// Run `query` to completion unless `cancel` fires first.
    pub async fn invoke_with_cancel(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<AgentRun> {
        self.start(query, cancel)?.run_to_completion().await
    }

    /// Run `query` step by step.
    ///
    /// Nothing happens until the stream is polled; dropping it stops the run.
    pub fn stream(&self, query: &str) -> Result<StepStream> {
        self.stream_with_cancel(query, CancellationToken::new())
    }

    pub fn stream_with_cancel(&self, query: &str, cancel: CancellationToken) -> Result<StepStream> {
        Ok(self.start(query, cancel)?.into_stream())
    }

    /// A fresh control loop seeded with `query`, for callers that drive
    /// the steps themselves.
    pub fn start(&self, query: &str, cancel: CancellationToken) -> Result<ControlLoop> {
        if query.trim().is_empty() {
            return Err(Error::config("query must not be empty"));
        }

        let state = AgentState::new(query);
        info!(
            run_id = %state.run_id,
            provider = self.provider.name(),
            model = %self.config.model,
            tools = self.tools.len(),
            max_iterations = self.config.max_iterations,
            "Starting run"
        );

        let reasoning = ReasoningStep::new(
            self.provider.clone(),
            self.tools.clone(),
            self.config.clone(),
            self.system_prompt.clone(),
        );
        let executor =
            ToolExecutor::new(self.tools.clone()).with_parallel(self.config.parallel_tools);

        Ok(ControlLoop::new(
            reasoning,
            executor,
            state,
            self.config.max_iterations,
            cancel,
        ))
    }
}

/// Mermaid diagram of the control loop, with the tools of `registry` noted
/// on the tool-execution state.
pub fn graph_mermaid(registry: &ToolRegistry) -> String {
    let mut diagram = LoopState::mermaid();
    let names = registry.names();
    let tools = if names.is_empty() {
        "no tools".to_string()
    } else {
        names.join(", ")
    };
    diagram.push_str(&format!(
        "    note right of {}: {tools}\n",
        LoopState::AwaitingTools.name()
    ));
    diagram
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("provider", &self.provider.name())
            .field("tools", &self.tools)
            .field("config", &self.config)
            .finish()
    }
}

/// Builds an [`Agent`]. A provider and an explicit tool set are required;
/// use [`AgentBuilder::without_tools`] for an agent with no tools.
#[derive(Default)]
pub struct AgentBuilder {
    provider: Option<Arc<dyn Provider>>,
    tools: Option<Arc<ToolRegistry>>,
    config: AgentConfig,
}

impl AgentBuilder {
    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tools(self, tools: ToolRegistry) -> Self {
        self.shared_tools(Arc::new(tools))
    }

    /// Use a registry shared with other agents.
    pub fn shared_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn without_tools(self) -> Self {
        self.tools(ToolRegistry::new())
    }

    /// Replace every setting at once.
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    pub fn parallel_tools(mut self, parallel: bool) -> Self {
        self.config.parallel_tools = parallel;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| Error::config("a model provider is required"))?;
        let tools = self.tools.ok_or_else(|| {
            Error::config("a tool set is required; use without_tools() for an agent with none")
        })?;
        self.config.validate()?;

        let system_prompt: Arc<str> = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
            .into();

        Ok(Agent {
            provider,
            tools,
            config: Arc::new(self.config),
            system_prompt,
        })
    }
}
