//! The control loop: the state machine that drives one run.
//!
//! ```text
//! AWAITING_REASONING ──(no requests)──────────► DONE
//!        │  ▲
//!  (requests) │
//!        ▼  │
//! AWAITING_TOOLS ──(results appended)──► AWAITING_REASONING
//! ```
//!
//! Every call to [`ControlLoop::next_step`] performs at most one step and
//! yields the event describing it. After the last step a single `Done`
//! event is yielded, then `None` forever. The iteration bound is checked
//! when `AWAITING_REASONING` is entered: after `max_iterations` reasoning
//! calls the run ends with `MaxIterationsExceeded` instead of calling the
//! backend again.

use futures::stream::{self, BoxStream, StreamExt};
use reactloop_core::agent::AgentState;
use reactloop_core::error::{Error, Result};
use reactloop_core::provider::Usage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::execution::ToolExecutor;
use crate::outcome::{AgentRun, FinalAnswer};
use crate::reasoning::{PlannedCall, ReasoningStep};
use crate::stream_event::StepEvent;

/// A lazy, finite, non-restartable sequence of step events.
pub type StepStream = BoxStream<'static, Result<StepEvent>>;

/// Observable state of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingReasoning,
    AwaitingTools,
    Done,
}

impl LoopState {
    /// Every edge of the state machine, labelled with its trigger.
    pub const TRANSITIONS: &'static [(LoopState, LoopState, &'static str)] = &[
        (Self::AwaitingReasoning, Self::AwaitingTools, "tool requests"),
        (Self::AwaitingReasoning, Self::Done, "final answer"),
        (Self::AwaitingReasoning, Self::Done, "iteration bound reached"),
        (Self::AwaitingTools, Self::AwaitingReasoning, "results appended"),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AwaitingReasoning => "AwaitingReasoning",
            Self::AwaitingTools => "AwaitingTools",
            Self::Done => "Done",
        }
    }

    /// The state machine as a Mermaid `stateDiagram-v2`.
    pub fn mermaid() -> String {
        let mut out = String::from("stateDiagram-v2\n");
        out.push_str(&format!("    [*] --> {}\n", Self::AwaitingReasoning.name()));
        for (from, to, label) in Self::TRANSITIONS {
            out.push_str(&format!("    {} --> {}: {label}\n", from.name(), to.name()));
        }
        out.push_str(&format!("    {} --> [*]\n", Self::Done.name()));
        out
    }
}

enum Phase {
    AwaitingReasoning,
    AwaitingTools(Vec<PlannedCall>),
    /// Terminal, with the `Done` event not yet yielded.
    Finishing(FinalAnswer),
    Done,
}

/// Drives one run from the seeded Message Log to a final answer.
pub struct ControlLoop {
    reasoning: ReasoningStep,
    executor: ToolExecutor,
    state: AgentState,
    phase: Phase,
    max_iterations: u32,
    cancel: CancellationToken,
    usage: Usage,
    answer: Option<FinalAnswer>,
}

impl ControlLoop {
    pub fn new(
        reasoning: ReasoningStep,
        executor: ToolExecutor,
        state: AgentState,
        max_iterations: u32,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            reasoning,
            executor,
            state,
            phase: Phase::AwaitingReasoning,
            max_iterations,
            cancel,
            usage: Usage::default(),
            answer: None,
        }
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn loop_state(&self) -> LoopState {
        match self.phase {
            Phase::AwaitingReasoning => LoopState::AwaitingReasoning,
            Phase::AwaitingTools(_) => LoopState::AwaitingTools,
            Phase::Finishing(_) | Phase::Done => LoopState::Done,
        }
    }

    /// Perform the next step. `None` once the run is over.
    pub async fn next_step(&mut self) -> Option<Result<StepEvent>> {
        if matches!(self.phase, Phase::Done) {
            return None;
        }

        if self.cancel.is_cancelled() {
            return Some(Err(self.cancelled()));
        }

        match std::mem::replace(&mut self.phase, Phase::Done) {
            Phase::AwaitingReasoning => Some(self.reason().await),
            Phase::AwaitingTools(plan) => Some(Ok(self.act(plan).await)),
            Phase::Finishing(answer) => Some(Ok(self.finish(answer))),
            Phase::Done => None,
        }
    }

    /// Drive the loop to its end.
    pub async fn run_to_completion(mut self) -> Result<AgentRun> {
        while let Some(step) = self.next_step().await {
            step?;
        }
        self.into_run()
            .ok_or_else(|| Error::Internal("control loop ended without an answer".into()))
    }

    /// Turn the loop into a stream of step events.
    ///
    /// Dropping the stream stops the run at the next step boundary.
    pub fn into_stream(self) -> StepStream {
        stream::unfold(self, |mut control| async move {
            let step = control.next_step().await?;
            Some((step, control))
        })
        .boxed()
    }

    /// The finished run; `None` unless the loop reached `Done` normally.
    pub fn into_run(self) -> Option<AgentRun> {
        let answer = self.answer?;
        Some(AgentRun {
            run_id: self.state.run_id,
            answer,
            iterations: self.state.iterations,
            log: self.state.log,
            usage: self.usage,
        })
    }

    async fn reason(&mut self) -> Result<StepEvent> {
        if self.state.iterations >= self.max_iterations {
            warn!(
                run_id = %self.state.run_id,
                max_iterations = self.max_iterations,
                "Iteration bound reached"
            );
            let answer = FinalAnswer::MaxIterationsExceeded {
                partial: self.state.log.latest_reasoning_text().map(String::from),
                iterations: self.state.iterations,
            };
            return Ok(self.finish(answer));
        }

        debug_assert!(
            self.state.log.unanswered_requests().is_empty(),
            "every tool request must be answered before the next reasoning call"
        );

        self.state.iterations += 1;
        let iteration = self.state.iterations;
        debug!(run_id = %self.state.run_id, iteration, "Awaiting reasoning");

        let cancel = self.cancel.clone();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.reasoning.run(&self.state.log, iteration) => Some(result),
        };
        let Some(result) = result else {
            return Err(self.cancelled());
        };

        let reasoning = match result {
            Ok(reasoning) => reasoning,
            Err(e) => {
                warn!(run_id = %self.state.run_id, iteration, error = %e, "Reasoning step failed");
                return Err(e.into());
            }
        };

        if let Some(usage) = reasoning.usage {
            self.usage = self.usage.add(usage);
        }

        let text = reasoning.message.text();
        let tool_requests = reasoning.message.tool_requests().to_vec();
        self.state.append(reasoning.message);

        self.phase = if reasoning.plan.is_empty() {
            Phase::Finishing(FinalAnswer::Complete { text: text.clone() })
        } else {
            Phase::AwaitingTools(reasoning.plan)
        };

        Ok(StepEvent::Reasoning {
            iteration,
            text,
            tool_requests,
        })
    }

    async fn act(&mut self, plan: Vec<PlannedCall>) -> StepEvent {
        let results = self.executor.execute(&plan).await;
        self.state.log.extend(results.iter().cloned());
        self.phase = Phase::AwaitingReasoning;

        StepEvent::ToolResults {
            iteration: self.state.iterations,
            results,
        }
    }

    fn finish(&mut self, answer: FinalAnswer) -> StepEvent {
        info!(
            run_id = %self.state.run_id,
            iterations = self.state.iterations,
            complete = answer.is_complete(),
            "Run finished"
        );
        self.phase = Phase::Done;
        self.answer = Some(answer.clone());
        StepEvent::Done {
            answer,
            iterations: self.state.iterations,
            usage: self.usage,
        }
    }

    fn cancelled(&mut self) -> Error {
        info!(run_id = %self.state.run_id, iterations = self.state.iterations, "Run cancelled");
        self.phase = Phase::Done;
        self.answer = None;
        Error::Cancelled {
            iterations: self.state.iterations,
        }
    }
}
