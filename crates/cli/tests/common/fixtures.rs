//! Temporary directory fixtures for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch area plus an isolated config directory
pub struct Workspace {
    _temp_dir: TempDir,
    root: PathBuf,
    config: PathBuf,
    data: PathBuf,
}

impl Workspace {
    /// Create an empty workspace
    ///
    /// Paths are canonicalized so they compare equal to what the
    /// filesystem and the watcher report.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");

        let root = base.join("files");
        let config = base.join("config");
        let data = base.join("data");
        fs::create_dir(&root).expect("Failed to create files dir");
        fs::create_dir(&config).expect("Failed to create config dir");
        fs::create_dir(&data).expect("Failed to create data dir");

        Self {
            _temp_dir: temp_dir,
            root,
            config,
            data,
        }
    }

    /// Directory the tests work in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the binary keeps its config and session in
    pub fn config_dir(&self) -> &Path {
        &self.config
    }

    /// Per-user data directory on the same volume, for the trash
    pub fn data_dir(&self) -> &Path {
        &self.data
    }

    /// Absolute path of `relative` inside the workspace
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file, creating parent directories
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Create a directory and its parents
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Sorted names directly inside `relative`
    pub fn names(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(relative))
            .expect("Failed to read dir")
            .map(|e| e.expect("Failed to read entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
