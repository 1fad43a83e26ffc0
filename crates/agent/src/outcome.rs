//! What a finished run hands back to the caller.

use reactloop_core::message::MessageLog;
use reactloop_core::provider::Usage;
use serde::{Deserialize, Serialize};

/// Shown when the iteration bound ran out before any reasoning text appeared.
pub const COULD_NOT_COMPLETE: &str =
    "I could not complete this request within the allowed number of reasoning steps.";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FinalAnswer {
    /// The model answered without requesting more tools.
    Complete { text: String },

    /// The iteration bound was reached first. `partial` is the most recent
    /// non-empty reasoning text, if any.
    MaxIterationsExceeded {
        partial: Option<String>,
        iterations: u32,
    },
}

impl FinalAnswer {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Best available answer text; never empty for an exhausted run.
    pub fn text(&self) -> &str {
        match self {
            Self::Complete { text } => text,
            Self::MaxIterationsExceeded {
                partial: Some(partial),
                ..
            } => partial,
            Self::MaxIterationsExceeded { partial: None, .. } => COULD_NOT_COMPLETE,
        }
    }
}

/// The result of [`Agent::invoke`](crate::Agent::invoke).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRun {
    /// Correlation ID used in the run's log lines
    pub run_id: String,

    pub answer: FinalAnswer,

    /// The complete Message Log of the run
    pub log: MessageLog,

    /// Reasoning calls made
    pub iterations: u32,

    /// Token usage summed over every reasoning call that reported it
    pub usage: Usage,
}

impl AgentRun {
    pub fn answer_text(&self) -> &str {
        self.answer.text()
    }

    /// Number of tool results recorded in the log.
    pub fn tool_calls_made(&self) -> usize {
        self.log
            .iter()
            .filter(|m| matches!(m, reactloop_core::Message::ToolResult { .. }))
            .count()
    }
}
