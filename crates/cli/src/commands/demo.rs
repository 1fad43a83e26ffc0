//! Demo mode: a fixed tour of the built-in tools.

use std::time::Instant;

use reactloop_agent::{Agent, CancellationToken};
use tokio::io::{self, AsyncBufReadExt, BufReader};

use super::run_log::RunLog;
use super::{query, render};

pub const DEMO_QUERIES: &[&str] = &[
    // calculator / arithmetic
    "What is 25 multiplied by 4, then add 50?",
    // web_search
    "What is LangGraph and how does it work?",
    // get_current_time
    "What is the current date and time?",
    // get_weather
    "What's the weather like in Tokyo?",
    // multi-step
    "If I have 3 apples costing $2 each and 5 oranges costing $1.50 each, what's my total cost?",
];

pub async fn run(
    agent: &Agent,
    show_steps: bool,
    cancel: CancellationToken,
    run_log: &mut RunLog,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n🎯 {}", "=".repeat(56));
    println!("    DEMO MODE: Running Predefined Queries");
    println!("{}\n", render::rule('='));

    let mut stdin = BufReader::new(io::stdin()).lines();
    let total = DEMO_QUERIES.len();

    for (i, q) in DEMO_QUERIES.iter().enumerate() {
        println!("\n{}", render::rule('─'));
        println!("📋 Demo Query {}/{total}", i + 1);
        println!("{}", render::rule('─'));
        println!("\n❓ Query: {q}\n");

        let start = Instant::now();
        match query::answer(agent, q, show_steps, cancel.clone()).await {
            Ok(run) => {
                println!("\n✅ Final Response:");
                println!("   {}", run.answer_text());
                query::save(run_log, q, &run, start.elapsed());
            }
            Err(e) if cancel.is_cancelled() => {
                println!("\n\n👋 {e}. Goodbye!");
                return Ok(());
            }
            Err(e) => println!("\n❌ Error: {e}"),
        }
        println!("\n⏱️  Completed in {:.2} seconds", start.elapsed().as_secs_f64());
        println!("{}", render::rule('─'));

        if i + 1 < total {
            println!("\n[Press Enter to continue to the next query...]");
            if stdin.next_line().await?.is_none() {
                break;
            }
        }
    }

    Ok(())
}
