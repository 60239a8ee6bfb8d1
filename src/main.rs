use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use planner::cli::{run_shell, Command, Session};
use planner::config::{PlannerPaths, Settings};
use planner::models::DocumentKind;

/// Environment variable controlling log verbosity
const LOG_ENV: &str = "PLANNER_LOG";

#[derive(Parser)]
#[command(
    name = "planner",
    author = "Kaylee Beyene",
    version,
    about = "Terminal student planner with contacts, expenses and backups",
    long_about = "Planner keeps an address book and an expense book with full \
                  undo/redo history. Books can be backed up to local files or to \
                  private GitHub Gists and restored from either."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Run(Command),

    /// Start an interactive shell
    #[command(alias = "repl")]
    Shell,

    /// Show current configuration and paths
    Config,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let paths = PlannerPaths::new()?;

    match cli.command {
        Some(Commands::Run(command)) => {
            let mut session = Session::open(paths)?;
            session.execute(command)?;
            session.finish()?;
            if session.failures() > 0 {
                bail!("{} operation(s) failed", session.failures());
            }
        }
        Some(Commands::Shell) => {
            let mut session = Session::open(paths)?;
            run_shell(&mut session)?;
        }
        Some(Commands::Config) => {
            let settings = Settings::load_or_create(&paths)?;
            println!("Planner Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Remote:");
            println!("  API URL:        {}", settings.remote.api_url);
            println!("  Worker threads: {}", settings.remote.worker_threads);
            println!("  Timeout:        {}s", settings.remote.timeout_secs);
            println!();
            println!("Books:");
            for kind in DocumentKind::ALL {
                let reference = settings
                    .reference(kind)
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "(none)".to_string());
                println!("  {}", kind);
                println!("    Backup file: {}", settings.backup_path(&paths, kind).display());
                println!("    Reference:   {}", reference);
            }
        }
        None => {
            println!("Planner - contacts and expenses from the command line");
            println!();
            println!("Run 'planner --help' for usage information.");
            println!("Run 'planner shell' to start an interactive session.");
        }
    }

    Ok(())
}
