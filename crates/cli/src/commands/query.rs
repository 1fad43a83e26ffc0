//! Single-query mode.

use std::time::Instant;

use reactloop_agent::{Agent, AgentRun, CancellationToken};
use reactloop_core::error::{Error, Result};

use super::render;
use super::run_log::RunLog;

pub async fn run(
    agent: &Agent,
    query: &str,
    show_steps: bool,
    cancel: CancellationToken,
    run_log: &mut RunLog,
) -> Result<()> {
    println!("\n❓ Query: {query}\n");

    let start = Instant::now();
    let run = answer(agent, query, show_steps, cancel).await?;
    let elapsed = start.elapsed();

    println!("\n✅ Response:");
    println!("   {}", run.answer_text());
    println!("\n⏱️  Completed in {:.2} seconds", elapsed.as_secs_f64());
    save(run_log, query, &run, elapsed);
    Ok(())
}

/// Run `query` to completion, printing each step when `show_steps` is set.
pub async fn answer(
    agent: &Agent,
    query: &str,
    show_steps: bool,
    cancel: CancellationToken,
) -> Result<AgentRun> {
    if show_steps {
        println!("🔄 Agent processing...");
    }

    let mut control = agent.start(query, cancel)?;
    let mut step = 0;
    while let Some(event) = control.next_step().await {
        let event = event?;
        step += 1;
        if show_steps {
            render::print_step(&event, step);
        }
    }
    control
        .into_run()
        .ok_or_else(|| Error::Internal("run ended without a final answer".into()))
}

/// Record a run; a failed write is reported but never ends the session.
pub fn save(run_log: &mut RunLog, query: &str, run: &AgentRun, elapsed: std::time::Duration) {
    if let Err(e) = run_log.record(query, run, elapsed) {
        eprintln!("⚠️  Could not write the run log: {e}");
    }
}
