//! The tool execution step.
//!
//! Runs a planned batch against the registry and produces exactly one
//! `ToolResult` per request, in request order. A failing call never stops
//! the rest of the batch.

use futures::future::join_all;
use reactloop_core::message::{Message, ToolOutcome};
use reactloop_core::tool::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::reasoning::PlannedCall;

#[derive(Clone)]
pub struct ToolExecutor {
    tools: Arc<ToolRegistry>,
    parallel: bool,
}

impl ToolExecutor {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self {
            tools,
            parallel: false,
        }
    }

    /// Run the calls of one batch concurrently. Result order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Execute `plan` and return its `ToolResult` entries in request order.
    pub async fn execute(&self, plan: &[PlannedCall]) -> Vec<Message> {
        debug!(calls = plan.len(), parallel = self.parallel, "Executing tool batch");
        if self.parallel {
            join_all(plan.iter().map(|call| self.run_one(call))).await
        } else {
            let mut results = Vec::with_capacity(plan.len());
            for call in plan {
                results.push(self.run_one(call).await);
            }
            results
        }
    }

    async fn run_one(&self, call: &PlannedCall) -> Message {
        let outcome = match call {
            PlannedCall::Dispatch(request) => {
                let result = self
                    .tools
                    .invoke(&request.name, request.arguments.clone())
                    .await;
                if let Err(e) = &result {
                    warn!(tool = %request.name, id = %request.id, error = %e, "Tool call failed");
                }
                ToolOutcome::from(result)
            }
            PlannedCall::Reject { error, .. } => ToolOutcome::Error {
                error: error.clone(),
            },
        };
        Message::tool_result(call.request(), outcome)
    }
}
