//! Burrow CLI - bw command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod util;

/// Burrow - browse and manage files with live directory views
#[derive(Parser)]
#[command(name = "bw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a directory
    Ls {
        /// Directory to list (default: last listed, or current)
        dir: Option<PathBuf>,
        /// Stat every entry, following symlinks
        #[arg(short, long)]
        detailed: bool,
        /// Include hidden entries
        #[arg(short, long)]
        all: bool,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show entry details
    Stat {
        /// Paths to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the tree from the filesystem root down to a path
    Tree {
        /// Path to reveal (default: current directory)
        path: Option<PathBuf>,
    },
    /// Create a new "untitled folder"
    Mkdir {
        /// Parent directory (default: current directory)
        parent: Option<PathBuf>,
    },
    /// Copy entries into a directory under collision-free names
    Cp {
        /// Entries to copy
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Destination directory
        destination: PathBuf,
    },
    /// Move entries into a directory
    Mv {
        /// Entries to move
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Destination directory
        destination: PathBuf,
    },
    /// Rename an entry in place
    Rename {
        /// Entry to rename
        path: PathBuf,
        /// New file name
        name: String,
    },
    /// Move entries to the trash
    Trash {
        /// Entries to trash
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Watch directories and print every change applied to their views
    Watch {
        /// Directories to watch (default: current directory)
        dirs: Vec<PathBuf>,
        /// Also keep a navigator tree revealing the first directory
        #[arg(long)]
        tree: bool,
    },
    /// View and edit system configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Get a configuration value
    Get {
        /// Key such as listing.show_hidden
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Key such as watch.max_directories
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Show an annotated example configuration
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (stderr keeps stdout clean for --json)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ls { dir, detailed, all, json } => cmd::ls::run(dir, detailed, all, json).await,
        Commands::Stat { paths, json } => cmd::stat::run(paths, json).await,
        Commands::Tree { path } => cmd::tree::run(path).await,
        Commands::Mkdir { parent } => cmd::mkdir::run(parent).await,
        Commands::Cp { sources, destination } => cmd::cp::run(sources, destination).await,
        Commands::Mv { sources, destination } => cmd::mv::run(sources, destination).await,
        Commands::Rename { path, name } => cmd::rename::run(path, &name).await,
        Commands::Trash { paths } => cmd::trash::run(paths).await,
        Commands::Watch { dirs, tree } => cmd::watch::run(dirs, tree).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list().await,
            ConfigCommands::Get { key } => cmd::config::run_get(&key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(&key, &value).await,
            ConfigCommands::Path { create } => cmd::config::run_path(create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        },
    }
}
