use anyhow::{anyhow, Context, Result};
use clap::Parser;
use codemate_core::config::{AssistantConfig, ConfigLoader};
use codemate_core::executors::ProcessCodeExecutor;
use codemate_core::{Assistant, Mode, Session};
use codemate_cli::repl::Repl;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "codemate", author, version = "0.1.0", about = "Mode-driven coding assistant")]
struct Cli {
    #[clap(long, short, default_value = "codemate.yaml", help = "Path to the YAML configuration file")]
    config: PathBuf,

    #[clap(long, short, help = "Log level (overrides logging.level from the config)")]
    log_level: Option<String>,

    #[clap(long, short, help = "Starting mode, e.g. \"Debugger\" or explain-code")]
    mode: Option<String>,

    #[clap(long, help = "Gemini model version, e.g. 2.5-flash")]
    model_version: Option<String>,

    #[clap(long, help = "Send a single message and print the reply to stdout")]
    task: Option<String>,

    #[clap(help = "Files to upload at startup")]
    files: Vec<PathBuf>,
}

fn apply_overrides(cli: &Cli, mut config: AssistantConfig) -> Result<AssistantConfig> {
    if let Some(name) = &cli.mode {
        if name.parse::<Mode>().is_err() {
            eprintln!("Warning: unknown mode '{}', starting in {} mode", name, Mode::FALLBACK);
        }
        config.assistant.default_mode = Mode::from_name_or_fallback(name);
    }
    if let Some(version) = &cli.model_version {
        config.llm.model_version = version.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

fn parse_log_level(level: &str) -> Result<LevelFilter> {
    level.parse::<LevelFilter>().map_err(|e| {
        anyhow!(
            "Invalid log level '{}' ({}), expected one of off, error, warn, info, debug, trace",
            level,
            e
        )
    })
}

/// Logs go to a file so the terminal only shows the conversation.
fn init_logging(config: &AssistantConfig) -> Result<()> {
    let level = parse_log_level(&config.logging.level)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.logging.file)
        .with_context(|| format!("Failed to open log file {}", config.logging.file.display()))?;

    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    better_panic::install();
    let cli = Cli::parse();

    let config = ConfigLoader::from_file_or_default(&cli.config)
        .await
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let config = apply_overrides(&cli, config)?;
    init_logging(&config)?;
    log::info!(
        "Configuration loaded (model {}, default mode {})",
        config.llm.model_name(),
        config.assistant.default_mode
    );

    let assistant = Assistant::from_config(&config)?;
    let session = Session::new(config.assistant.default_mode);
    let executor = ProcessCodeExecutor::from_config(&config.executor);
    let mut repl = Repl::new(assistant, session, Box::new(executor));

    match cli.task {
        Some(task) => run_task_mode(repl, &cli.files, task).await,
        None => {
            println!("{}", repl.banner());
            if !cli.files.is_empty() {
                repl.upload_paths(&cli.files, &mut std::io::stdout()).await?;
            }
            repl.run().await
        }
    }
}

/// Run task mode - send one message and print the reply to stdout
async fn run_task_mode(mut repl: Repl, files: &[PathBuf], task: String) -> Result<()> {
    if !files.is_empty() {
        repl.upload_paths(files, &mut std::io::stderr()).await?;
    }
    log::info!("Executing task: {}", task);
    let reply = repl.submit(&task).await;
    if let Some(err) = reply.failure {
        log::error!("Task execution failed: {}", err);
        anyhow::bail!("Task execution failed: {}", err);
    }
    println!("{}", reply.content);
    Ok(())
}
