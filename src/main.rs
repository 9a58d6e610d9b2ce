//! Stagehand - Terminal dashboard for git

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use stagehand::App;
use stagehand::config::Config;
use stagehand::git::Git;

/// Terminal dashboard for staging, committing, branching and stashing
#[derive(Parser)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to open (defaults to the current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Config file to load instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity written to /tmp/stagehand.log (0=off, 1=warn, 2=info, 3=debug)
    #[arg(long)]
    debug: Option<u8>,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let --help and --version exit normally
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    init_logging(cli.debug);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let git = Git::discover(&path, &config)?;
    tracing::info!(root = %git.root().display(), "Opened repository");

    let app = App::new(config, Arc::new(git));
    stagehand::tui::run(app)
}

/// Log to /tmp/stagehand.log - tail with: tail -f /tmp/stagehand.log
///
/// `--debug` wins over `DEBUG=0-3`.
fn init_logging(flag: Option<u8>) {
    if let Err(e) = std::fs::write("/tmp/stagehand.log", "") {
        eprintln!("Warning: Failed to clear log file: {e}");
    }

    let debug_level = flag
        .or_else(|| {
            std::env::var("DEBUG")
                .ok()
                .and_then(|v| v.parse::<u8>().ok())
        })
        .unwrap_or(0);

    if debug_level > 0 {
        let level = match debug_level {
            1 => tracing::Level::WARN,
            2 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        };

        let file_appender = tracing_appender::rolling::never("/tmp", "stagehand.log");
        tracing_subscriber::fmt()
            .with_writer(file_appender)
            .with_max_level(level)
            .with_ansi(false)
            .init();
    }
}
