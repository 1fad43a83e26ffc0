//! Shared test helpers: a scripted provider and deterministic stub tools.

use async_trait::async_trait;
use reactloop_core::error::{ProviderError, ToolError};
use reactloop_core::message::ToolRequest;
use reactloop_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use reactloop_core::tool::{Tool, ToolOutput, ToolRegistry};
use std::sync::Mutex;
use std::time::Duration;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next entry and records the request.
/// With `repeat_last`, the final entry is returned forever; otherwise
/// running past the script panics. With a `delay`, every call sleeps
/// before answering.
pub struct ScriptedProvider {
    script: Vec<Result<ProviderResponse, ProviderError>>,
    repeat_last: bool,
    delay: Option<Duration>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            script: responses.into_iter().map(Ok).collect(),
            repeat_last: false,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model that answers every call with `response`.
    pub fn always(response: ProviderResponse) -> Self {
        Self {
            repeat_last: true,
            ..Self::new(vec![response])
        }
    }

    /// A backend whose first call fails.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            script: vec![Err(error)],
            repeat_last: false,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Scripted responses followed by a failure.
    pub fn then_fail(responses: Vec<ProviderResponse>, error: ProviderError) -> Self {
        let mut provider = Self::new(responses);
        provider.script.push(Err(error));
        provider
    }

    /// Answer each call only after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let entry = {
            let mut requests = self.requests.lock().unwrap();
            let index = requests.len();
            requests.push(request);

            match self.script.get(index) {
                Some(entry) => entry.clone(),
                None if self.repeat_last && !self.script.is_empty() => {
                    self.script[self.script.len() - 1].clone()
                }
                None => panic!(
                    "ScriptedProvider: no more responses (call #{}, have {})",
                    index,
                    self.script.len()
                ),
            }
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        entry
    }
}

/// Create a simple text response (no tool calls).
pub fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        usage: Some(usage()),
        ..ProviderResponse::text(text, "mock-model")
    }
}

/// Create a response with tool calls and optional thought content.
pub fn tool_response(tool_calls: Vec<ToolRequest>, thought: &str) -> ProviderResponse {
    ProviderResponse {
        content: thought.to_string(),
        tool_calls,
        usage: Some(usage()),
        model: "mock-model".into(),
    }
}

pub fn tool_call(id: &str, name: &str, args: serde_json::Value) -> ToolRequest {
    ToolRequest::new(id, name, args)
}

fn usage() -> Usage {
    Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    }
}

fn number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn operands_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "a": { "type": "number" },
            "b": { "type": "number" }
        },
        "required": ["a", "b"]
    })
}

/// `multiply(a, b)` returning the bare product, e.g. "100".
pub struct MultiplyStub;

#[async_trait]
impl Tool for MultiplyStub {
    fn name(&self) -> &str {
        "multiply"
    }
    fn description(&self) -> &str {
        "Multiply two numbers"
    }
    fn parameters_schema(&self) -> serde_json::Value {
        operands_schema()
    }
    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let a = arguments["a"].as_f64().unwrap_or_default();
        let b = arguments["b"].as_f64().unwrap_or_default();
        Ok(ToolOutput::text(number(a * b)))
    }
}

pub struct AddStub;

#[async_trait]
impl Tool for AddStub {
    fn name(&self) -> &str {
        "add"
    }
    fn description(&self) -> &str {
        "Add two numbers"
    }
    fn parameters_schema(&self) -> serde_json::Value {
        operands_schema()
    }
    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let a = arguments["a"].as_f64().unwrap_or_default();
        let b = arguments["b"].as_f64().unwrap_or_default();
        Ok(ToolOutput::text(number(a + b)))
    }
}

/// Always fails.
pub struct FlakyStub;

#[async_trait]
impl Tool for FlakyStub {
    fn name(&self) -> &str {
        "flaky"
    }
    fn description(&self) -> &str {
        "A tool whose backing service is down"
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }
    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        Err(ToolError::execution_failed("service unavailable"))
    }
}

/// Sleeps `ms` milliseconds, then echoes `label`.
pub struct SleepStub;

#[async_trait]
impl Tool for SleepStub {
    fn name(&self) -> &str {
        "sleep"
    }
    fn description(&self) -> &str {
        "Wait, then echo a label"
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "ms": { "type": "integer" },
                "label": { "type": "string" }
            },
            "required": ["ms", "label"]
        })
    }
    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let ms = arguments["ms"].as_u64().unwrap_or_default();
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(ToolOutput::text(arguments["label"].as_str().unwrap_or_default()))
    }
}

/// Registry holding `multiply`, `add`, `flaky` and `sleep`, in that order.
pub fn registry_with_stubs() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(MultiplyStub)).unwrap();
    registry.register(Box::new(AddStub)).unwrap();
    registry.register(Box::new(FlakyStub)).unwrap();
    registry.register(Box::new(SleepStub)).unwrap();
    registry
}
