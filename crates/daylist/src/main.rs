//! CLI entry point for daylist.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use daylist_app::{AppConfig, TaskStore, TaskStoreError};
use daylist_core::{Filter, Priority};
use daylist_store_file::FileStore;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod render;

const APP_DIR: &str = "daylist";
/// Exit status for input the store rejected (blank text, bad due date).
const EXIT_REJECTED: i32 = 2;

/// Short tasks with priorities and due dates, kept in a local data directory.
#[derive(Parser, Debug)]
#[command(
    name = "daylist",
    version,
    about = "daylist: a small task list with filters, search, and due dates"
)]
struct Cli {
    /// Directory holding tasks and config.toml (defaults to the platform data dir).
    #[arg(long, env = "DAYLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task; words are joined with spaces.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// low, medium, or high (defaults to config).
        #[arg(short = 'p', long)]
        priority: Option<Priority>,
        /// Due date as YYYY-MM-DD.
        #[arg(short = 'd', long, default_value = "")]
        due: String,
    },

    /// Flip a task between active and completed.
    Toggle { id: String },

    /// Delete a task.
    Rm { id: String },

    /// Delete every completed task.
    ClearCompleted,

    /// List tasks through the current view.
    Ls {
        /// all, active, completed, or overdue.
        #[arg(short = 'f', long)]
        filter: Option<Filter>,
        /// Case-insensitive substring to search for.
        #[arg(short = 's', long, default_value = "")]
        search: String,
        /// date, priority, or dueDate; without a value, the order after the default.
        #[arg(long, num_args = 0..=1, default_missing_value = commands::NEXT_SORT)]
        sort: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show task counts.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(exit_status(&err));
    }
}

fn run() -> Result<()> {
    let Cli { data_dir, cmd } = Cli::parse();
    install_tracing();

    let data_dir = resolve_data_dir(data_dir)?;
    let mut stdout = std::io::stdout().lock();
    execute_command(data_dir, cmd, &mut stdout)
}

fn exit_status(err: &anyhow::Error) -> i32 {
    let rejected = err
        .downcast_ref::<TaskStoreError>()
        .is_some_and(TaskStoreError::is_validation);
    if rejected { EXIT_REJECTED } else { 1 }
}

fn execute_command(data_dir: PathBuf, command: Command, out: &mut impl Write) -> Result<()> {
    let config = AppConfig::from_dir(&data_dir)?;
    debug!(dir = %data_dir.display(), ?config, "Resolved configuration");

    let storage = FileStore::open(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    let mut store = TaskStore::load(storage)?.with_query(config.view.initial_query());
    if config.tasks.seed_samples {
        store.seed_samples()?;
    }

    commands::run(command, &mut store, &config, out)
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|base| base.join(APP_DIR))
        .ok_or_else(|| anyhow!("failed to resolve a data directory; pass --data-dir"))
}

fn install_tracing() {
    // Logs go to stderr; stdout carries listings.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
