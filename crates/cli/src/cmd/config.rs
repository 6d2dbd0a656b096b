//! Configuration management command
//!
//! Provides CLI interface to view and edit system configuration.

use anyhow::{Context, Result};
use burrow_cli::system_config::{self, KEYS};
use owo_colors::OwoColorize;

/// List all configuration values
pub async fn run_list() -> Result<()> {
    let config = system_config::load()?;
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "System Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!("{}", "[listing]".yellow());
    println!("  {} = {}", "show_hidden".cyan(), config.listing.show_hidden);
    println!("  {} = {}", "date_format".cyan(), config.listing.date_format);

    println!("\n{}", "[watch]".yellow());
    println!(
        "  {} = {}",
        "max_directories".cyan(),
        config.watch.max_directories
    );
    println!("  {} = {}", "include_tree".cyan(), config.watch.include_tree);

    println!("\n{}", "[session]".yellow());
    println!(
        "  {} = {}",
        "remember_last_directory".cyan(),
        config.session.remember_last_directory
    );

    println!("\n{}", "Valid Ranges:".bold());
    println!("  max_directories: 1-1024");
    println!("  date_format: relative | absolute");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(key: &str) -> Result<()> {
    let config = system_config::load()?;
    let value = config
        .get(key)
        .with_context(|| format!("Use 'bw config list' to see available keys ({})", KEYS.join(", ")))?;

    println!("{}", value);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = system_config::load()?;

    config.set(key, value).context("Invalid configuration value")?;
    system_config::save(&config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(create: bool) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && !config_path.exists() {
        system_config::init_if_missing()?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    println!("{}", system_config::example_config());
    Ok(())
}
