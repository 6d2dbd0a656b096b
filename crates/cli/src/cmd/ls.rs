//! List a directory

use crate::util;
use anyhow::{Context, Result};
use burrow_cli::session_store::{SessionStore, LAST_DIRECTORY_KEY};
use burrow_cli::{system_config, Browser};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::warn;

pub async fn run(dir: Option<PathBuf>, detailed: bool, all: bool, json: bool) -> Result<()> {
    let config = system_config::load().context("Failed to load configuration")?;
    let store = util::open_session_store()?;

    // 1. Pick the directory: argument, remembered, or current
    let directory = match dir {
        Some(dir) => util::absolutize(&dir)?,
        None => match store
            .get(LAST_DIRECTORY_KEY)
            .filter(|_| config.session.remember_last_directory)
        {
            Some(last) => PathBuf::from(last),
            None => std::env::current_dir().context("Failed to get current directory")?,
        },
    };

    // 2. Read it
    let browser = Browser::new();
    let mut entries = if detailed {
        browser.list_entries_detailed(&directory).await
    } else {
        browser.list_entries(&directory).await
    }
    .with_context(|| format!("Failed to list {}", directory.display()))?;

    if !(all || config.listing.show_hidden) {
        entries.retain(|entry| !entry.is_hidden());
    }

    // 3. Remember it for next time
    if config.session.remember_last_directory {
        if let Err(e) = store.set(LAST_DIRECTORY_KEY, &directory.to_string_lossy()) {
            warn!("Failed to remember last directory: {}", e);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", directory.display().bold());
    for entry in &entries {
        util::display_entry_row(entry, config.listing.date_format);
    }
    println!(
        "{}",
        format!(
            "{} entries ({} directories)",
            entries.len(),
            entries.iter().filter(|e| e.is_dir()).count()
        )
        .dimmed()
    );

    Ok(())
}
