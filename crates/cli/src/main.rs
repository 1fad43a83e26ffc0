//! reactloop CLI: the main entry point.
//!
//! Modes:
//! - `--query "..."`: answer a single query
//! - `--demo`: run the predefined demo queries
//! - (no flags): interactive session
//!
//! `--init` writes a default config and `--graph` prints the loop as a
//! Mermaid diagram; neither needs credentials.

use std::path::PathBuf;

use clap::Parser;
use commands::run_log::RunLog;
use reactloop_agent::CancellationToken;
use reactloop_config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "reactloop",
    about = "reactloop: a ReAct (reason + act) agent with tools",
    version,
    after_help = EXAMPLES
)]
struct Cli {
    /// Single query to process
    #[arg(short, long)]
    query: Option<String>,

    /// Run predefined demo queries
    #[arg(short, long, conflicts_with = "query")]
    demo: bool,

    /// Hide step-by-step execution details
    #[arg(long)]
    quiet: bool,

    /// API key for the model backend
    #[arg(long, env = "REACTLOOP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model backend: google, openai, openrouter, ollama, groq, deepseek
    #[arg(long)]
    provider: Option<String>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// Maximum reasoning calls per query
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Append every run (query, response, duration, log) to this JSON file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the agent's control loop as a Mermaid diagram and exit
    #[arg(long, conflicts_with_all = ["query", "demo"])]
    graph: bool,

    /// Write a default config file to ~/.reactloop/config.toml and exit
    #[arg(long, conflicts_with_all = ["query", "demo", "graph"])]
    init: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

const EXAMPLES: &str = "\
Examples:
  reactloop                            # Interactive mode
  reactloop --demo                     # Run demo queries
  reactloop --query \"What is 2+2?\"     # Single query
  reactloop --query \"...\" --quiet      # Without step details
  reactloop --query \"...\" --log-file runs.json
  reactloop --graph                    # Mermaid diagram of the loop";

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(provider) = &self.provider {
            config.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    if cli.init {
        return commands::init::run();
    }

    let mut config = AppConfig::load()?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    if cli.graph {
        let tools = commands::build_tools(&config)?;
        print!("{}", reactloop_agent::graph_mermaid(&tools));
        return Ok(());
    }

    println!("{}", commands::render::banner("reactloop"));

    let agent = commands::build_agent(&config)?;

    // Ctrl-C stops the current run at the next step boundary.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut run_log = match cli.log_file {
        Some(path) => RunLog::open(path)?,
        None => RunLog::disabled(),
    };

    let show_steps = !cli.quiet;
    if cli.demo {
        commands::demo::run(&agent, show_steps, cancel, &mut run_log).await?;
    } else if let Some(query) = cli.query {
        commands::query::run(&agent, &query, show_steps, cancel, &mut run_log).await?;
    } else {
        commands::interactive::run(&agent, cancel, &mut run_log).await?;
    }

    Ok(())
}
