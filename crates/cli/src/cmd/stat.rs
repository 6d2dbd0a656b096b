//! Show entry details

use crate::util;
use anyhow::{Context, Result};
use burrow_cli::Browser;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(paths: Vec<PathBuf>, json: bool) -> Result<()> {
    let browser = Browser::new();

    let mut entries = Vec::with_capacity(paths.len());
    for path in util::absolutize_all(&paths)? {
        let entry = browser
            .stat_entry(&path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        entries.push(entry);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", entry.name.bold());
        println!("  {:<10} {:?}", "Type:".dimmed(), entry.kind);
        println!("  {:<10} {}", "Path:".dimmed(), entry.path.display());
        println!("  {:<10} {}", "URL:".dimmed(), entry.url);
        if entry.is_file() {
            println!("  {:<10} {} ({} bytes)", "Size:".dimmed(), util::format_size(entry.size), entry.size);
        }
        println!("  {:<10} {}", "Created:".dimmed(), util::format_absolute_time(entry.date_created));
        println!("  {:<10} {}", "Modified:".dimmed(), util::format_absolute_time(entry.date_modified));
        println!("  {:<10} {}", "Opened:".dimmed(), util::format_absolute_time(entry.date_last_opened));
        if let Some(thumbnail) = browser.thumbnail(&entry.path) {
            println!("  {:<10} {}", "Thumbnail:".dimmed(), thumbnail);
        }
    }

    Ok(())
}
