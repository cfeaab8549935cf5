use std::process::ExitCode;
use std::time::Duration;

use ai_client::WebSource;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dataxray::render::{results_html, results_terminal};
use dataxray::{Config, Controller, Phase, Platform, UiState};

mod interactive;

#[derive(Parser)]
#[command(name = "dataxray")]
#[command(about = "Find public datasets with search-grounded AI")]
#[command(version)]
struct Cli {
    /// Also log provider request details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the results
    Search {
        /// Free-text description of the data you want
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Platform scope (all, kaggle, huggingface, github, gov, papers)
        #[arg(short, long, default_value = "all")]
        platform: Platform,

        /// Rewrite the query with the optimizer before searching
        #[arg(long)]
        optimize: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print an optimized version of a query
    Optimize {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Menu-driven session (default)
    Interactive {
        #[arg(short, long, default_value = "all")]
        platform: Platform,
    },

    /// List the available platform scopes
    Platforms,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Serialize)]
struct JsonResults<'a> {
    query: &'a str,
    platform: Platform,
    summary: &'a str,
    count: usize,
    results: Vec<&'a WebSource>,
    error: Option<&'a str>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match log_filter(cli.verbose) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(1);
        }
    };
    // Results go to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn log_filter(verbose: bool) -> Result<EnvFilter> {
    let filter = EnvFilter::from_default_env().add_directive("dataxray=info".parse()?);
    if verbose {
        return Ok(filter.add_directive("ai_client=debug".parse()?));
    }
    Ok(filter)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Platforms) => {
            cmd_platforms();
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Search {
            query,
            platform,
            optimize,
            format,
        }) => cmd_search(&load_config()?, &query.join(" "), platform, optimize, format).await,
        Some(Commands::Optimize { query }) => {
            cmd_optimize(&load_config()?, &query.join(" ")).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Interactive { platform }) => {
            interactive::run(&load_config()?, platform).await?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            interactive::run(&load_config()?, Platform::default()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    config.log_redacted();
    Ok(config)
}

pub(crate) fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn cmd_platforms() {
    for platform in Platform::ALL {
        let suffix = match platform.query_suffix() {
            "" => "(no scope)",
            s => s,
        };
        println!("{:<12} {:<14} {}", platform.id(), platform.name(), suffix);
    }
}

async fn cmd_optimize(config: &Config, query: &str) -> Result<()> {
    let mut controller = Controller::new(config.gemini());
    let bar = spinner("Optimizing query...".to_string());
    let optimized = controller.optimize(query).await;
    bar.finish_and_clear();

    match optimized {
        Some(optimized) => println!("{optimized}"),
        None => bail!("query must not be blank"),
    }
    Ok(())
}

async fn cmd_search(
    config: &Config,
    query: &str,
    platform: Platform,
    optimize: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    let mut controller = Controller::new(config.gemini());
    controller.select_platform(platform);

    let mut query = query.to_string();
    if optimize {
        let bar = spinner("Optimizing query...".to_string());
        let optimized = controller.optimize(&query).await;
        bar.finish_and_clear();
        if let Some(optimized) = optimized {
            eprintln!("Optimized query: {optimized}");
            query = optimized;
        }
    }

    let Some(ticket) = controller.begin_search(&query) else {
        bail!("query must not be blank");
    };
    let bar = spinner(format!("Scanning repositories for '{}'...", ticket.query()));
    let result = controller.run_search(&ticket).await;
    bar.finish_and_clear();
    controller.complete_search(ticket, result);

    let state = controller.state();
    match format {
        OutputFormat::Text => println!("{}", results_terminal(state)),
        OutputFormat::Html => println!("{}", results_html(state)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json_results(state))?),
    }

    Ok(match state.phase() {
        Phase::Failed => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    })
}

fn json_results(state: &UiState) -> JsonResults<'_> {
    JsonResults {
        query: &state.query,
        platform: state.selected_platform,
        summary: &state.summary,
        count: state.result_count(),
        results: state.visible_results().collect(),
        error: state.error.as_deref(),
    }
}
