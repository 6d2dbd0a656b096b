//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use burrow_cli::session_store::JsonSessionStore;
use burrow_cli::system_config::{self, DateFormat};
use burrow_core::Entry;
use owo_colors::OwoColorize;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against the current directory
///
/// Purely lexical: `.` and `..` are folded without touching the
/// filesystem, so symlinks are operated on rather than their targets.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(path)
    };

    let mut clean = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                clean.pop();
            }
            other => clean.push(other.as_os_str()),
        }
    }
    Ok(clean)
}

/// Absolutize every path in `paths`
pub fn absolutize_all(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    paths.iter().map(|p| absolutize(p)).collect()
}

/// Open the session store next to the configuration file
pub fn open_session_store() -> Result<JsonSessionStore> {
    let dir = system_config::config_dir().context("Could not determine config directory")?;
    Ok(JsonSessionStore::in_directory(&dir))
}

/// Format timestamp as relative time ("2 hours ago")
pub fn format_relative_time(ts_ms: u64) -> String {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    let duration = Duration::from_millis(ts_ms);
    let datetime = UNIX_EPOCH + duration;

    if let Ok(elapsed) = SystemTime::now().duration_since(datetime) {
        let seconds = elapsed.as_secs();

        if seconds < 60 {
            format!("{} seconds ago", seconds)
        } else if seconds < 3600 {
            format!("{} minutes ago", seconds / 60)
        } else if seconds < 86400 {
            format!("{} hours ago", seconds / 3600)
        } else if seconds < 604800 {
            format!("{} days ago", seconds / 86400)
        } else {
            format!("{} weeks ago", seconds / 604800)
        }
    } else {
        "in the future".to_string()
    }
}

/// Format timestamp as absolute UTC time ("2024-01-03 14:30:00")
pub fn format_absolute_time(ts_ms: u64) -> String {
    let secs = ts_ms / 1000;
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    // Civil-from-days, http://howardhinnant.github.io/date_algorithms.html
    let epoch_days = days + 719468;
    let era = epoch_days / 146097;
    let doe = epoch_days - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if m <= 2 { y + 1 } else { y };

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year, m, d, hours, minutes, seconds
    )
}

/// Format an entry timestamp; 0 means the platform had none
pub fn format_date(ts_ms: u64, format: DateFormat) -> String {
    if ts_ms == 0 {
        return "-".to_string();
    }
    match format {
        DateFormat::Relative => format_relative_time(ts_ms),
        DateFormat::Absolute => format_absolute_time(ts_ms),
    }
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Display an entry as one listing row: size, date, name
pub fn display_entry_row(entry: &Entry, date_format: DateFormat) {
    let size = if entry.is_dir() {
        "-".to_string()
    } else {
        format_size(entry.size)
    };
    let date = format_date(entry.date_modified, date_format);

    if entry.is_dir() {
        println!(
            "{:>10}  {:<20}  {}",
            size.dimmed(),
            date.dimmed(),
            format!("{}/", entry.name).blue().bold()
        );
    } else {
        println!("{:>10}  {:<20}  {}", size, date.dimmed(), entry.name);
    }
}

/// Display one created/changed path after an operation
pub fn display_result(verb: &str, entry: &Entry) {
    println!("{} {} {}", "✓".green(), verb, entry.path.display().cyan());
}
