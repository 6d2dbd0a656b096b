//! Rename an entry in place

use crate::util;
use anyhow::{Context, Result};
use burrow_cli::Browser;
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: &str) -> Result<()> {
    let path = util::absolutize(&path)?;

    let entry = Browser::new()
        .rename_entry(&path, name)
        .await
        .with_context(|| format!("Failed to rename {}", path.display()))?;

    util::display_result("Renamed to", &entry);
    Ok(())
}
