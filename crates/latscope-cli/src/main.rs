use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use latscope_cli::{OutputFormat, commands};
use latscope_core::Config;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "latscope")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Build request latency reports from rotated web server access logs",
    long_about = "Latscope picks the newest rotated access log, aggregates request latency \
                  per URL and publishes a static HTML report for it. Run it once per rotation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the JSON configuration file
    #[arg(short, long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the report for the newest log
    Run,

    /// Show which log the next run would process
    Locate,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completion { shell } = cli.command {
        return commands::completion::execute(shell, &mut Cli::command());
    }

    let loaded = load_config(&cli.config)?;
    let empty_config = loaded.is_none();
    let config = loaded.unwrap_or_default();

    // Initialize logging
    init_logging(cli.verbose, &config)?;
    if empty_config {
        tracing::warn!(
            "Configuration file {} is empty, using defaults",
            cli.config.display()
        );
    }
    tracing::debug!("Using configuration: {:?}", config);
    tracing::debug!("Output format: {}", cli.format.as_str());

    // Execute the command
    match cli.command {
        Commands::Run => commands::run::execute(&config, cli.format),
        Commands::Locate => commands::locate::execute(&config, cli.format),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Read the configuration file; `None` means it was empty
fn load_config(path: &Path) -> Result<Option<Config>> {
    Config::read(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn init_logging(verbose: bool, config: &Config) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let filter = EnvFilter::try_new(format!(
        "latscope={level},latscope_cli={level},latscope_core={level}"
    ))
    .with_context(|| format!("Invalid LOG_LEVEL: {}", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.without_time().with_writer(std::io::stderr).init(),
    }

    Ok(())
}
