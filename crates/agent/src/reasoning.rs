//! The reasoning step: one call to the model backend.
//!
//! Sends the Message Log, the system prompt and the tool schemas, and turns
//! the response into a `ReasoningOutput` plus a plan for the execution step.
//! Requests naming an unregistered tool are planned as rejections so they
//! are answered with an `UnknownTool` observation without ever being invoked.

use reactloop_core::agent::AgentConfig;
use reactloop_core::error::{ProviderError, ToolError};
use reactloop_core::message::{Message, MessageLog, ToolRequest};
use reactloop_core::provider::{Provider, ProviderRequest, Usage};
use reactloop_core::tool::ToolRegistry;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// One planned tool call, in request order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedCall {
    /// A registered tool; invoke it.
    Dispatch(ToolRequest),

    /// Answer with `error` without invoking anything.
    Reject {
        request: ToolRequest,
        error: ToolError,
    },
}

impl PlannedCall {
    pub fn request(&self) -> &ToolRequest {
        match self {
            Self::Dispatch(request) | Self::Reject { request, .. } => request,
        }
    }
}

/// The outcome of one reasoning step.
#[derive(Debug, Clone)]
pub struct Reasoning {
    /// The `ReasoningOutput` to append to the log
    pub message: Message,

    /// One entry per tool request; empty means a final answer
    pub plan: Vec<PlannedCall>,

    pub usage: Option<Usage>,
}

impl Reasoning {
    pub fn is_final(&self) -> bool {
        self.plan.is_empty()
    }
}

/// Invokes the backend. Holds no state between calls.
#[derive(Clone)]
pub struct ReasoningStep {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    config: Arc<AgentConfig>,
    system_prompt: Arc<str>,
}

impl ReasoningStep {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: Arc<AgentConfig>,
        system_prompt: Arc<str>,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
            system_prompt,
        }
    }

    /// Run one reasoning call over `log`. `iteration` is 1-based and only
    /// used to name requests that arrive without a usable id.
    pub async fn run(&self, log: &MessageLog, iteration: u32) -> Result<Reasoning, ProviderError> {
        let request = ProviderRequest {
            model: self.config.model.clone(),
            system_prompt: self.system_prompt.to_string(),
            messages: log.messages().to_vec(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            tools: self.tools.definitions(),
        };

        debug!(
            provider = self.provider.name(),
            iteration,
            messages = log.len(),
            "Reasoning step"
        );
        let response = self.provider.complete(request).await?;

        let mut requests = response.tool_calls;
        assign_request_ids(&mut requests, iteration);

        let plan = requests
            .iter()
            .cloned()
            .map(|request| {
                if self.tools.contains(&request.name) {
                    PlannedCall::Dispatch(request)
                } else {
                    warn!(tool = %request.name, "Model requested an unknown tool");
                    let error = ToolError::UnknownTool {
                        name: request.name.clone(),
                    };
                    PlannedCall::Reject { request, error }
                }
            })
            .collect();

        Ok(Reasoning {
            message: Message::reasoning(response.content, requests),
            plan,
            usage: response.usage,
        })
    }
}

/// Give every request a non-empty id that is unique within the batch.
///
/// Missing or repeated ids become `call_<iteration>_<index>`.
fn assign_request_ids(requests: &mut [ToolRequest], iteration: u32) {
    let mut seen: HashSet<String> = HashSet::new();
    for (index, request) in requests.iter_mut().enumerate() {
        if request.id.trim().is_empty() || seen.contains(&request.id) {
            let mut id = format!("call_{iteration}_{index}");
            while seen.contains(&id) {
                id.push('_');
            }
            request.id = id;
        }
        seen.insert(request.id.clone());
    }
}
