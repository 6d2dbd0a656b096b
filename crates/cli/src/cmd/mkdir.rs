//! Create a new folder

use crate::util;
use anyhow::{Context, Result};
use burrow_cli::Browser;
use std::path::PathBuf;

pub async fn run(parent: Option<PathBuf>) -> Result<()> {
    let parent = match parent {
        Some(parent) => util::absolutize(&parent)?,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let entry = Browser::new()
        .create_directory(&parent)
        .await
        .with_context(|| format!("Failed to create a folder in {}", parent.display()))?;

    util::display_result("Created", &entry);
    Ok(())
}
