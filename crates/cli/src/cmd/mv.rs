//! Move entries into a directory

use crate::util;
use anyhow::{Context, Result};
use burrow_cli::Browser;
use std::path::PathBuf;

pub async fn run(sources: Vec<PathBuf>, destination: PathBuf) -> Result<()> {
    let sources = util::absolutize_all(&sources)?;
    let destination = util::absolutize(&destination)?;
    let browser = Browser::new();

    // A single move reports its own error
    if let [source] = sources.as_slice() {
        let entry = browser
            .move_entry(source, &destination)
            .await
            .with_context(|| format!("Failed to move {}", source.display()))?;
        util::display_result("Moved to", &entry);
        return Ok(());
    }

    let moved = browser.move_entries(&sources, &destination).await;
    for entry in &moved {
        util::display_result("Moved to", entry);
    }

    if moved.len() < sources.len() {
        anyhow::bail!(
            "{} of {} items could not be moved",
            sources.len() - moved.len(),
            sources.len()
        );
    }
    Ok(())
}
