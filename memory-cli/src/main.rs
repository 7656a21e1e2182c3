use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod errors;
mod output;

use commands::{event::EventCommands, goal::GoalCommands, pipeline::PipelineCommands, query::QueryArgs, task::TaskCommands};
use config::{initialize_storage, CliConfig};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "memory-cli")]
#[command(about = "Command-line interface for the memory-core cognitive memory substrate")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project id to operate on, overriding the config file's default
    #[arg(short, long)]
    project: Option<String>,

    /// redb database file, overriding the config file's db_path
    #[arg(long, value_name = "FILE")]
    db_path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Enable verbose (debug-level) logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Episodic event ingestion and listing
    #[command(alias = "ev")]
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Goal hierarchy management
    #[command(alias = "g")]
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Prospective task (reminder) management
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Two-stage spatial/semantic memory retrieval
    #[command(alias = "q")]
    Query(QueryArgs),
    /// Run the consolidation/attention pipeline
    #[command(alias = "p")]
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(project) = &cli.project {
        config.default_project = project.clone();
    }
    if let Some(db_path) = &cli.db_path {
        config.db_path = db_path.clone();
    }

    let handle = initialize_storage(config).await?;

    match cli.command {
        Commands::Event { command } => commands::event::run(command, &handle, cli.format).await,
        Commands::Goal { command } => commands::goal::run(command, &handle, cli.format).await,
        Commands::Task { command } => commands::task::run(command, &handle, cli.format).await,
        Commands::Query(args) => commands::query::run(args, &handle, cli.format).await,
        Commands::Pipeline { command } => commands::pipeline::run(command, &handle, cli.format).await,
    }
}
