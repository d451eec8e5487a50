use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser};

use valentine::config::AppConfig;
use valentine::logging::{self, LogFormat, LogLevel};

use crate::Commands;

#[derive(Parser)]
#[command(name = "valentine")]
#[command(about = "Ask someone to be your valentine", long_about = None)]
pub(crate) struct Cli {
    /// Config file (JSON); defaults to $VALENTINE_CONFIG
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    log: LogArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct LogArgs {
    #[arg(long = "log-level", global = true, value_enum, default_value_t = LogLevel::Info)]
    level: LogLevel,

    #[arg(long = "log-format", global = true, value_enum, default_value_t = LogFormat::Human)]
    format: LogFormat,

    /// Write logs here while the terminal UI is running
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    file: Option<PathBuf>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        None => run_tui(&cli.log, None, config),
        Some(Commands::Play(args)) => run_tui(&cli.log, args.url, config),
        Some(command) => {
            logging::init(cli.log.level, cli.log.format);
            crate::cli_exec::handle_command(command, &config)
        }
    }
}

fn run_tui(log: &LogArgs, url: Option<String>, config: AppConfig) -> Result<()> {
    // stderr belongs to the alternate screen; log to a file or not at all.
    if let Some(path) = &log.file {
        logging::init_file(log.level, log.format, path)?;
    }
    valentine::tui::run_with_options(valentine::tui::TuiRunOptions { url, config })
}
