use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use selnav::config::Config;
use selnav::store::JsonFileStore;

mod cli;

use cli::history::Session;

#[derive(Parser)]
#[command(name = "selnav")]
#[command(about = "Selection Navigator - recent and pinned selection history")]
#[command(version)]
struct Cli {
    /// Project directory whose files stand in for assets (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.selnav/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the preference store (defaults to ~/.selnav/prefs.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Scene file currently open, relative to the project (repeatable)
    #[arg(long = "open-scene", global = true)]
    open_scenes: Vec<String>,

    /// Prefab file currently being edited
    #[arg(long, global = true)]
    edit_prefab: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a selection (asset:<id>, scene:<ctx>:<path>, prefab:<ctx>:<path>)
    ///
    /// Context ids are project-relative and cannot contain ':'; hierarchy
    /// paths can.
    Record { target: String },

    /// Toggle the pin on a target
    Pin { target: String },

    /// Remove a target from history
    Remove { target: String },

    /// List history grouped by context
    List {
        /// Only show pinned items
        #[arg(long)]
        pinned: bool,

        /// Show the flattened history instead of sections
        #[arg(long, conflicts_with = "pinned")]
        all: bool,
    },

    /// Re-resolve every item and drop deleted assets
    Reconcile,

    /// Step through history (positive = older)
    Step {
        #[arg(allow_hyphen_values = true)]
        delta: isize,

        /// Start from this target instead of the most recent item
        #[arg(long)]
        from: Option<String>,

        /// Step through pinned items only
        #[arg(long)]
        pinned: bool,
    },

    /// Clear history
    Clear {
        /// Keep pinned items
        #[arg(long)]
        keep_pinned: bool,
    },

    /// Initialize a new ~/.selnav/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        init_logging(cli.verbose);
        return cli::init::init_command(cli.config, force);
    }

    let config_path = cli.config.unwrap_or_else(Config::global_config_path);
    let config = Config::load_or_init(&config_path)?;
    init_logging(cli.verbose || config.history.verbose_logs);

    let session = Session {
        project: cli.project.unwrap_or_else(|| PathBuf::from(".")),
        store: cli.store.unwrap_or_else(JsonFileStore::default_path),
        settings: config.history,
        open_scenes: cli.open_scenes,
        edit_prefab: cli.edit_prefab,
    };

    match cli.command {
        Commands::Record { target } => cli::history::record_command(&session, &target)?,
        Commands::Pin { target } => cli::history::pin_command(&session, &target)?,
        Commands::Remove { target } => cli::history::remove_command(&session, &target)?,
        Commands::List { pinned, all } => cli::history::list_command(&session, pinned, all)?,
        Commands::Reconcile => cli::history::reconcile_command(&session)?,
        Commands::Step {
            delta,
            from,
            pinned,
        } => cli::history::step_command(&session, delta, from, pinned)?,
        Commands::Clear { keep_pinned } => cli::history::clear_command(&session, keep_pinned)?,
        Commands::Init { .. } => {}
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
