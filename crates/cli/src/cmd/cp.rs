//! Copy entries

use crate::util;
use anyhow::{Context, Result};
use burrow_cli::Browser;
use std::path::PathBuf;

pub async fn run(sources: Vec<PathBuf>, destination: PathBuf) -> Result<()> {
    let sources = util::absolutize_all(&sources)?;
    let destination = util::absolutize(&destination)?;

    let copied = Browser::new()
        .copy_entries(&sources, &destination)
        .await
        .with_context(|| format!("Failed to copy into {}", destination.display()))?;

    for entry in &copied {
        util::display_result("Copied to", entry);
    }

    if copied.len() < sources.len() {
        anyhow::bail!(
            "{} of {} items could not be copied",
            sources.len() - copied.len(),
            sources.len()
        );
    }
    Ok(())
}
