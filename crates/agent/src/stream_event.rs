//! Step events yielded while the control loop runs.
//!
//! A run yields one `Reasoning` event per reasoning call, one `ToolResults`
//! event per executed batch, and a single terminal `Done` event:
//! - `reasoning`: the model's text and the tool calls it requested
//! - `tool_results`: the observations for the latest batch, in request order
//! - `done`: the run is over

use reactloop_core::message::{Message, ToolRequest};
use reactloop_core::provider::Usage;
use serde::{Deserialize, Serialize};

use crate::outcome::FinalAnswer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepEvent {
    /// A reasoning step finished.
    Reasoning {
        iteration: u32,
        text: String,
        tool_requests: Vec<ToolRequest>,
    },

    /// A tool execution step finished. Every entry is a `ToolResult`.
    ToolResults { iteration: u32, results: Vec<Message> },

    /// The run is complete.
    Done {
        answer: FinalAnswer,
        iterations: u32,
        usage: Usage,
    },
}

impl StepEvent {
    /// Event name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Reasoning { .. } => "reasoning",
            Self::ToolResults { .. } => "tool_results",
            Self::Done { .. } => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}
