//! Move entries to the trash

use crate::util;
use anyhow::Result;
use burrow_cli::Browser;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(paths: Vec<PathBuf>) -> Result<()> {
    let paths = util::absolutize_all(&paths)?;
    let trashed = Browser::new().trash_entries(&paths).await;

    for path in &trashed {
        println!("{} Trashed {}", "✓".green(), path.display().cyan());
    }

    if trashed.len() < paths.len() {
        anyhow::bail!(
            "{} of {} items could not be trashed",
            paths.len() - trashed.len(),
            paths.len()
        );
    }
    Ok(())
}
