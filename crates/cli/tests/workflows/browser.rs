//! Browser service workflows against real directories and live watchers

use crate::common::Workspace;
use burrow_cli::Browser;
use std::time::Duration;
use tokio::time::timeout;
use view::{EntryList, Reconciler};
use watcher::{EventKind, EventStream, SubscriberId, WatchEvent};

const QUIET: Duration = Duration::from_millis(500);

/// Collect events until the stream stays quiet for `QUIET`
async fn drain(stream: &mut EventStream) -> Vec<WatchEvent> {
    let mut events = Vec::new();
    while let Ok(Some(event)) = timeout(QUIET, stream.recv()).await {
        events.push(event);
    }
    events
}

fn names(list: &EntryList) -> Vec<&str> {
    list.iter().map(|e| e.name.as_str()).collect()
}

#[tokio::test]
async fn test_create_directory_sequence() {
    let ws = Workspace::new();
    let browser = Browser::new();

    for _ in 0..3 {
        browser.create_directory(ws.root()).await.unwrap();
    }

    assert_eq!(
        ws.names(""),
        vec!["untitled folder", "untitled folder 2", "untitled folder 3"]
    );

    // Deleting the middle one frees its number
    std::fs::remove_dir(ws.path("untitled folder 2")).unwrap();
    let entry = browser.create_directory(ws.root()).await.unwrap();
    assert_eq!(entry.name, "untitled folder 2");
}

#[tokio::test]
async fn test_copy_twice_gets_numbered_names() {
    let ws = Workspace::new();
    let photo = ws.write_file("photo.png", "pixels");
    let browser = Browser::new();

    let first = browser
        .copy_entries(&[photo.clone()], ws.root())
        .await
        .unwrap();
    let second = browser.copy_entries(&[photo], ws.root()).await.unwrap();

    assert_eq!(first[0].name, "photo copy.png");
    assert_eq!(second[0].name, "photo copy 2.png");
    assert_eq!(
        std::fs::read_to_string(ws.path("photo copy 2.png")).unwrap(),
        "pixels"
    );
}

#[tokio::test]
async fn test_move_into_same_directory_is_silent() {
    let ws = Workspace::new();
    let file = ws.write_file("a.txt", "a");
    let browser = Browser::new();
    let id = SubscriberId(1);

    let mut stream = browser.connect(id);
    browser.watch(id, vec![ws.root().to_path_buf()]);

    let entry = browser.move_entry(&file, ws.root()).await.unwrap();
    assert_eq!(entry.path, file);
    assert!(file.exists());

    let events = drain(&mut stream).await;
    assert!(events.is_empty(), "unexpected events: {:?}", events);

    browser.disconnect(id);
}

#[tokio::test]
async fn test_move_updates_both_lists() {
    let ws = Workspace::new();
    let file = ws.write_file("a.txt", "a");
    let sub = ws.mkdir("sub");
    let browser = Browser::new();
    let id = SubscriberId(2);

    let mut reconciler = Reconciler::new();
    reconciler.open_list(ws.root(), &browser).await.unwrap();
    reconciler.open_list(&sub, &browser).await.unwrap();

    let mut stream = browser.connect(id);
    browser.watch(id, reconciler.watch_targets());

    let moved = browser.move_entry(&file, &sub).await.unwrap();
    assert_eq!(moved.path, sub.join("a.txt"));

    let events = drain(&mut stream).await;
    assert!(events.contains(&WatchEvent::deleted(&file)));
    assert!(events.contains(&WatchEvent::created(sub.join("a.txt"))));

    for event in &events {
        reconciler.handle(event, &browser).await;
    }

    assert_eq!(names(reconciler.list(ws.root()).unwrap()), vec!["sub"]);
    assert_eq!(names(reconciler.list(&sub).unwrap()), vec!["a.txt"]);

    browser.disconnect(id);
}

#[tokio::test]
async fn test_case_only_rename_leaves_one_entry() {
    let ws = Workspace::new();
    let file = ws.write_file("x.txt", "x");
    let browser = Browser::new();
    let id = SubscriberId(3);

    let mut reconciler = Reconciler::new();
    reconciler.open_list(ws.root(), &browser).await.unwrap();

    let mut stream = browser.connect(id);
    browser.watch(id, reconciler.watch_targets());

    let renamed = browser.rename_entry(&file, "X.txt").await.unwrap();
    assert_eq!(renamed.name, "X.txt");
    reconciler.apply_entries(&[renamed]);

    let events = drain(&mut stream).await;
    assert!(events
        .iter()
        .any(|e| e.kind == EventKind::Delete && e.file_path == file));

    for event in &events {
        reconciler.handle(event, &browser).await;
    }

    assert_eq!(names(reconciler.list(ws.root()).unwrap()), vec!["X.txt"]);
    browser.disconnect(id);
}

#[tokio::test]
async fn test_trash_missing_path_fails() {
    let ws = Workspace::new();
    let browser = Browser::new();

    let err = browser.trash_entry(&ws.path("ghost.txt")).await.unwrap_err();
    assert!(err.is_not_found());

    let trashed = browser.trash_entries(&[ws.path("ghost.txt")]).await;
    assert!(trashed.is_empty());
}

#[tokio::test]
async fn test_same_named_sources_move_only_what_moved() {
    let ws = Workspace::new();
    let a = ws.mkdir("a");
    let b = ws.mkdir("b");
    ws.write_file("a/x.txt", "a");
    ws.write_file("b/x.txt", "b");
    let browser = Browser::new();
    let id = SubscriberId(4);

    let mut reconciler = Reconciler::new();
    reconciler.open_list(&b, &browser).await.unwrap();

    let mut stream = browser.connect(id);
    browser.watch(id, reconciler.watch_targets());

    // a/x.txt is already there; b/x.txt collides with it and stays
    let moved = browser
        .move_entries(&[a.join("x.txt"), b.join("x.txt")], &a)
        .await;
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].path, a.join("x.txt"));

    let events = drain(&mut stream).await;
    assert!(events.is_empty(), "unexpected events: {:?}", events);

    assert!(ws.path("b/x.txt").exists());
    assert_eq!(names(reconciler.list(&b).unwrap()), vec!["x.txt"]);
    browser.disconnect(id);
}

#[tokio::test]
async fn test_trash_removes_entry_from_views() {
    let ws = Workspace::new();
    // Keep the trash on the workspace volume
    std::env::set_var("XDG_DATA_HOME", ws.data_dir());

    let file = ws.write_file("old.txt", "bye");
    ws.write_file("keep.txt", "stay");
    let browser = Browser::new();
    let id = SubscriberId(5);

    let mut reconciler = Reconciler::new();
    reconciler.open_list(ws.root(), &browser).await.unwrap();

    let mut stream = browser.connect(id);
    browser.watch(id, reconciler.watch_targets());

    browser.trash_entry(&file).await.unwrap();
    assert!(!file.exists());

    let events = drain(&mut stream).await;
    assert!(events.contains(&WatchEvent::deleted(&file)));

    for event in &events {
        reconciler.handle(event, &browser).await;
    }

    assert_eq!(names(reconciler.list(ws.root()).unwrap()), vec!["keep.txt"]);
    browser.disconnect(id);
}

#[tokio::test]
async fn test_tree_reveals_target() {
    let ws = Workspace::new();
    let deep = ws.mkdir("a/b");
    ws.mkdir("a/sibling");
    let browser = Browser::new();

    let root = browser.root_entry(&deep).await.unwrap();
    let tree = view::EntryTree::new(root);

    assert!(tree.get(&deep).map(|n| n.is_loaded()).unwrap_or(false));
    assert!(tree.get(&ws.path("a")).map(|n| n.is_loaded()).unwrap_or(false));

    let sibling = tree.get(&ws.path("a/sibling")).unwrap();
    assert!(!sibling.is_loaded());
}
