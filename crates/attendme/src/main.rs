use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use attendme_logging::{init_tracing, LogFormat};

mod config;
mod display;
mod sessions;

use config::ProjectConfig;
use sessions::{handle_sessions_command, SessionsAction};

#[derive(Parser, Debug)]
#[command(
    name = "attendme",
    about = "Browse course sessions by calendar window",
    version,
    author
)]
struct Cli {
    /// Config file (default: ./attendme.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tracing level or filter directive (RUST_LOG overrides)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatChoice>,

    #[command(subcommand)]
    action: SessionsAction,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => ProjectConfig::load_file(path)?,
        None => {
            let working_dir =
                std::env::current_dir().with_context(|| "Failed to get current directory")?;
            ProjectConfig::load(&working_dir)?.unwrap_or_default()
        }
    };

    let log_format = cli
        .log_format
        .map(LogFormat::from)
        .or(config.log_format)
        .unwrap_or(LogFormat::Compact);
    init_tracing(config.log_level(cli.log_level.as_deref()), log_format);

    tracing::debug!(?config, "Loaded configuration");

    handle_sessions_command(cli.action, &config)
}
