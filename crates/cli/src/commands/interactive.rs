//! Interactive chat session on stdin/stdout.

use std::io::Write;
use std::time::Instant;

use reactloop_agent::{Agent, CancellationToken};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use super::run_log::RunLog;
use super::{query, render};

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    Quit,
    Help,
    Verbose(bool),
    Query(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let lower = line.to_lowercase();
    match lower.as_str() {
        "" => Input::Empty,
        "quit" | "exit" | "q" => Input::Quit,
        "help" => Input::Help,
        "verbose on" => Input::Verbose(true),
        "verbose off" => Input::Verbose(false),
        _ => Input::Query(line.to_string()),
    }
}

fn print_intro() {
    println!("\n🎮 {}", "=".repeat(56));
    println!("    INTERACTIVE MODE");
    println!("{}", render::rule('='));
    println!("\nType your questions below. Commands:");
    println!("  'quit' or 'exit'  - End session");
    println!("  'verbose on/off'  - Toggle step visibility");
    println!("  'help'            - Show available tools");
    println!("{}\n", render::rule('─'));
}

fn print_tools(agent: &Agent) {
    println!("\n📚 Available Tools:");
    for definition in agent.tools().definitions() {
        println!("  • {} - {}", definition.name, definition.description);
    }
}

fn prompt() {
    print!("\n💬 You > ");
    let _ = std::io::stdout().flush();
}

pub async fn run(
    agent: &Agent,
    cancel: CancellationToken,
    run_log: &mut RunLog,
) -> Result<(), Box<dyn std::error::Error>> {
    print_intro();

    let mut lines = LinesStream::new(BufReader::new(io::stdin()).lines());
    let mut verbose = true;

    loop {
        prompt();
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                println!("\n\n👋 Session interrupted. Goodbye!");
                return Ok(());
            }
            line = lines.next() => line,
        };
        let Some(line) = line.transpose()? else {
            println!();
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => {
                println!("\n👋 Thanks for using reactloop! Goodbye!");
                break;
            }
            Input::Help => print_tools(agent),
            Input::Verbose(on) => {
                verbose = on;
                println!("🔧 Verbose mode: {}", if on { "ON" } else { "OFF" });
            }
            Input::Query(q) => {
                println!("\n🤖 Agent thinking...");
                let start = Instant::now();
                match query::answer(agent, &q, verbose, cancel.clone()).await {
                    Ok(run) => {
                        let elapsed = start.elapsed();
                        println!("\n{}", render::rule('─'));
                        println!("🤖 Assistant > {}", run.answer_text());
                        println!("⏱️  ({:.2}s)", elapsed.as_secs_f64());
                        query::save(run_log, &q, &run, elapsed);
                    }
                    Err(_) if cancel.is_cancelled() => {
                        println!("\n\n👋 Session interrupted. Goodbye!");
                        break;
                    }
                    Err(e) => {
                        println!("\n❌ [Error] {e}");
                        println!("Please try again or type 'quit' to exit.");
                    }
                }
            }
        }
    }

    Ok(())
}
