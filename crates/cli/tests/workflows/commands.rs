//! End-to-end `bw` command workflows

use crate::bw;
use crate::common::Workspace;
use anyhow::Result;

#[test]
fn test_ls_json_lists_sorted_entries() -> Result<()> {
    let ws = Workspace::new();
    ws.write_file("b.txt", "bb");
    ws.write_file("a.txt", "a");
    ws.mkdir("docs");
    ws.write_file(".hidden", "");

    let root = ws.root().to_string_lossy().to_string();
    let result = bw!(ws.root(), ws.config_dir(), "ls", &root, "--json").assert_success()?;
    assert_eq!(result.entry_names()?, vec!["a.txt", "b.txt", "docs"]);

    let result = bw!(ws.root(), ws.config_dir(), "ls", &root, "--json", "--all").assert_success()?;
    assert_eq!(result.entry_names()?, vec![".hidden", "a.txt", "b.txt", "docs"]);

    let entries = result.parse_entries()?;
    let b = entries.iter().find(|e| e.name == "b.txt").unwrap();
    assert_eq!(b.size, 2);
    assert!(b.url.starts_with("file://"));
    Ok(())
}

#[test]
fn test_ls_remembers_last_directory() -> Result<()> {
    let ws = Workspace::new();
    ws.write_file("docs/readme.md", "hi");

    let docs = ws.path("docs").to_string_lossy().to_string();
    bw!(ws.root(), ws.config_dir(), "ls", &docs).assert_success()?;

    // No argument: back to the directory listed last
    let result = bw!(ws.root(), ws.config_dir(), "ls", "--json").assert_success()?;
    assert_eq!(result.entry_names()?, vec!["readme.md"]);
    assert!(ws.config_dir().join("session.json").exists());
    Ok(())
}

#[test]
fn test_ls_missing_directory_fails() -> Result<()> {
    let ws = Workspace::new();
    let result = bw!(ws.root(), ws.config_dir(), "ls", "nowhere").assert_failure()?;
    assert!(result.contains_stderr("Failed to list"));
    Ok(())
}

#[test]
fn test_mkdir_numbers_folders() -> Result<()> {
    let ws = Workspace::new();

    bw!(ws.root(), ws.config_dir(), "mkdir").assert_success()?;
    let result = bw!(ws.root(), ws.config_dir(), "mkdir", ".").assert_success()?;

    assert!(result.contains_stdout("untitled folder 2"));
    assert_eq!(ws.names(""), vec!["untitled folder", "untitled folder 2"]);
    Ok(())
}

#[test]
fn test_cp_into_same_directory() -> Result<()> {
    let ws = Workspace::new();
    ws.write_file("photo.png", "pixels");
    ws.write_file("album/track.mp3", "la");

    bw!(ws.root(), ws.config_dir(), "cp", "photo.png", "album", ".").assert_success()?;

    assert_eq!(
        ws.names(""),
        vec!["album", "album copy", "photo copy.png", "photo.png"]
    );
    assert_eq!(ws.names("album copy"), vec!["track.mp3"]);
    Ok(())
}

#[test]
fn test_cp_reports_partial_failure() -> Result<()> {
    let ws = Workspace::new();
    ws.write_file("a.txt", "a");
    ws.mkdir("out");

    let result =
        bw!(ws.root(), ws.config_dir(), "cp", "a.txt", "missing.txt", "out").assert_failure()?;

    assert!(result.contains_stderr("1 of 2 items could not be copied"));
    assert_eq!(ws.names("out"), vec!["a.txt"]);
    Ok(())
}

#[test]
fn test_mv_and_collision() -> Result<()> {
    let ws = Workspace::new();
    ws.write_file("a.txt", "first");
    ws.mkdir("sub");

    bw!(ws.root(), ws.config_dir(), "mv", "a.txt", "sub").assert_success()?;
    assert_eq!(ws.names("sub"), vec!["a.txt"]);

    // Same name already in the destination
    ws.write_file("a.txt", "second");
    bw!(ws.root(), ws.config_dir(), "mv", "a.txt", "sub").assert_failure()?;
    assert_eq!(std::fs::read_to_string(ws.path("sub/a.txt"))?, "first");
    assert!(ws.path("a.txt").exists());
    Ok(())
}

#[test]
fn test_mv_into_own_descendant_fails() -> Result<()> {
    let ws = Workspace::new();
    ws.mkdir("outer/inner");

    bw!(ws.root(), ws.config_dir(), "mv", "outer", "outer/inner").assert_failure()?;
    assert!(ws.path("outer/inner").exists());
    Ok(())
}

#[test]
fn test_rename() -> Result<()> {
    let ws = Workspace::new();
    ws.write_file("draft.txt", "text");
    ws.write_file("taken.txt", "other");

    bw!(ws.root(), ws.config_dir(), "rename", "draft.txt", "final.txt").assert_success()?;
    assert_eq!(ws.names(""), vec!["final.txt", "taken.txt"]);

    bw!(ws.root(), ws.config_dir(), "rename", "final.txt", "taken.txt").assert_failure()?;
    bw!(ws.root(), ws.config_dir(), "rename", "final.txt", "../escape.txt").assert_failure()?;
    assert_eq!(ws.names(""), vec!["final.txt", "taken.txt"]);
    Ok(())
}

#[test]
fn test_stat_json() -> Result<()> {
    let ws = Workspace::new();
    ws.write_file("a.txt", "abc");

    let result = bw!(ws.root(), ws.config_dir(), "stat", "a.txt", "--json").assert_success()?;
    let entries = result.parse_entries()?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, ws.path("a.txt"));
    assert_eq!(entries[0].size, 3);
    Ok(())
}

#[test]
fn test_config_set_get_and_path() -> Result<()> {
    let ws = Workspace::new();

    let result = bw!(ws.root(), ws.config_dir(), "config", "get", "watch.max_directories")
        .assert_success()?;
    assert_eq!(result.stdout.trim(), "64");

    bw!(ws.root(), ws.config_dir(), "config", "set", "watch.max_directories", "8")
        .assert_success()?;
    let result = bw!(ws.root(), ws.config_dir(), "config", "get", "watch.max_directories")
        .assert_success()?;
    assert_eq!(result.stdout.trim(), "8");

    // Out of range values are rejected and the file keeps the old one
    bw!(ws.root(), ws.config_dir(), "config", "set", "watch.max_directories", "0")
        .assert_failure()?;
    bw!(ws.root(), ws.config_dir(), "config", "get", "nope").assert_failure()?;

    let result = bw!(ws.root(), ws.config_dir(), "config", "path").assert_success()?;
    assert!(result.contains_stdout(&ws.config_dir().to_string_lossy()));
    Ok(())
}
