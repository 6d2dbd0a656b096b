//! Show the navigator tree revealing one path

use crate::util;
use anyhow::{Context, Result};
use burrow_cli::Browser;
use burrow_core::Entry;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(path: Option<PathBuf>) -> Result<()> {
    let target = match path {
        Some(path) => util::absolutize(&path)?,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let browser = Browser::new();
    let root = browser
        .root_entry(&target)
        .await
        .with_context(|| format!("Failed to build tree for {}", target.display()))?;

    display_node(&root, 0);
    Ok(())
}

fn display_node(entry: &Entry, depth: usize) {
    let indent = "  ".repeat(depth);
    match &entry.children {
        Some(children) => {
            println!("{}{} {}", indent, "▾".dimmed(), entry.name.blue().bold());
            for child in children {
                display_node(child, depth + 1);
            }
        }
        None if entry.is_dir() => println!("{}{} {}", indent, "▸".dimmed(), entry.name.blue()),
        None => println!("{}  {}", indent, entry.name),
    }
}
