//! Watch directories and keep reconciled views current

use crate::util;
use anyhow::{Context, Result};
use burrow_cli::{system_config, Browser};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::{debug, warn};
use view::{Applied, EntryTree, Reconciler};
use watcher::{EventKind, SubscriberId, WatchEvent};

pub async fn run(dirs: Vec<PathBuf>, tree: bool) -> Result<()> {
    let config = system_config::load().context("Failed to load configuration")?;
    let max = config.watch.max_directories;

    let directories = if dirs.is_empty() {
        vec![std::env::current_dir().context("Failed to get current directory")?]
    } else {
        util::absolutize_all(&dirs)?
    };
    if directories.len() > max {
        anyhow::bail!(
            "Cannot watch {} directories (watch.max_directories = {})",
            directories.len(),
            max
        );
    }

    // 1. Build the views
    let browser = Browser::new();
    let mut reconciler = Reconciler::new();
    for directory in &directories {
        reconciler
            .open_list(directory, &browser)
            .await
            .with_context(|| format!("Failed to list {}", directory.display()))?;
    }
    if tree || config.watch.include_tree {
        let root = browser
            .root_entry(&directories[0])
            .await
            .with_context(|| format!("Failed to build tree for {}", directories[0].display()))?;
        reconciler.set_tree(Some(EntryTree::new(root)));
    }

    // 2. Subscribe
    let id = SubscriberId(u64::from(std::process::id()));
    let mut stream = browser.connect(id);
    let mut targets = watch_targets(&reconciler, max);
    browser.watch(id, targets.clone());

    println!(
        "{} {} directories. Press Ctrl+C to stop.",
        "Watching".bold(),
        targets.len()
    );
    for list in reconciler.lists() {
        println!("  {} ({} entries)", list.directory().display().cyan(), list.len());
    }

    // 3. Apply events until interrupted
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = stream.recv() => {
                let Some(event) = event else {
                    warn!("Event stream closed");
                    break;
                };
                let applied = reconciler.handle(&event, &browser).await;
                display_applied(&event, &applied);

                let next = watch_targets(&reconciler, max);
                if next != targets {
                    debug!("Watch set changed: {} directories", next.len());
                    browser.watch(id, next.clone());
                    targets = next;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    browser.disconnect(id);

    println!();
    for list in reconciler.lists() {
        println!("{} {} entries", list.directory().display().cyan(), list.len());
    }
    Ok(())
}

/// Listed directories first, then loaded tree directories, up to `max`
fn watch_targets(reconciler: &Reconciler, max: usize) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = reconciler
        .lists()
        .map(|list| list.directory().to_path_buf())
        .collect();

    let candidates = reconciler.watch_targets();
    let total = candidates.len();
    for directory in candidates {
        if targets.len() >= max {
            warn!("Watching only {} of {} directories", max, total);
            break;
        }
        if !targets.contains(&directory) {
            targets.push(directory);
        }
    }
    targets
}

fn display_applied(event: &WatchEvent, applied: &Applied) {
    match applied {
        Applied::Upserted(entry) => {
            let marker = match event.kind {
                EventKind::Create => "+".green().to_string(),
                _ => "~".yellow().to_string(),
            };
            println!("{} {}", marker, entry.path.display());
        }
        Applied::Removed(path) => println!("{} {}", "-".red(), path.display()),
        Applied::Ignored => println!(
            "{} {} {}",
            "?".dimmed(),
            event.file_path.display().dimmed(),
            "(unreadable)".dimmed()
        ),
    }
}
