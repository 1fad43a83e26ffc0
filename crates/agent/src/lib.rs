//! The reason/act control loop.
//!
//! The agent follows a **Reason → Act → Observe** cycle:
//!
//! 1. **Seed** the Message Log with the user's query
//! 2. **Reason**: send the log, the system prompt and the tool schemas to the backend
//! 3. **If tool requests**: execute them in order, append one result per request, go to 2
//! 4. **If text only**: that text is the final answer
//!
//! The loop also ends when the iteration bound is reached, with the best
//! partial answer available.

pub mod agent;
pub mod control;
pub mod execution;
pub mod outcome;
pub mod prompt;
pub mod reasoning;
pub mod stream_event;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use agent::{Agent, AgentBuilder, graph_mermaid};
pub use control::{ControlLoop, LoopState, StepStream};
pub use execution::ToolExecutor;
pub use outcome::{AgentRun, COULD_NOT_COMPLETE, FinalAnswer};
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use reasoning::{PlannedCall, Reasoning, ReasoningStep};
pub use stream_event::StepEvent;
pub use tokio_util::sync::CancellationToken;
