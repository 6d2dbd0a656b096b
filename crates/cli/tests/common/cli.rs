//! CLI command execution helpers with automatic timing
//!
//! This module provides a wrapper around the `bw` CLI binary that
//! isolates its configuration in a temporary directory, measures
//! execution time and provides convenient assertion methods.

use anyhow::{Context, Result};
use burrow_core::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

/// Environment variable the binary reads its config directory from
pub const CONFIG_DIR_ENV: &str = "BURROW_CONFIG_DIR";

/// CLI command builder with timing
pub struct BwCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl BwCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            binary_path: find_bw_binary(),
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Point the binary at an isolated config directory
    pub fn config_dir(&mut self, dir: &Path) -> &mut Self {
        self.env(CONFIG_DIR_ENV, &dir.to_string_lossy())
    }

    /// Execute command and return result with timing
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .envs(&self.env)
            .output()
            .context("Failed to execute command")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// Parse entries printed with `--json`
    pub fn parse_entries(&self) -> Result<Vec<Entry>> {
        serde_json::from_str(&self.stdout)
            .with_context(|| format!("Stdout is not an entry list:\n{}", self.stdout))
    }

    /// Names of entries printed with `--json`
    pub fn entry_names(&self) -> Result<Vec<String>> {
        Ok(self.parse_entries()?.into_iter().map(|e| e.name).collect())
    }
}

/// Find the bw binary in the target directory
fn find_bw_binary() -> PathBuf {
    // Cargo builds the binary for integration tests and tells us where
    if let Some(path) = option_env!("CARGO_BIN_EXE_bw") {
        return PathBuf::from(path);
    }

    let mut path = std::env::current_exe().expect("Failed to get current exe path");

    // Go up from test binary location
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps/

    path.join("bw")
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// bw!(dir, config, "mkdir").assert_success()?;
/// bw!(dir, config, "ls", "--json").assert_success()?.parse_entries()?;
/// ```
#[macro_export]
macro_rules! bw {
    ($dir:expr, $config:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::BwCommand::new($dir);
        cmd.config_dir($config);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries_rejects_plain_output() {
        let result = CommandResult {
            stdout: "Created /tmp/untitled folder".to_string(),
            stderr: String::new(),
            exit_code: 0,
            duration: Duration::from_millis(10),
        };

        assert!(result.parse_entries().is_err());
    }

    #[test]
    fn test_parse_empty_listing() {
        let result = CommandResult {
            stdout: "[]\n".to_string(),
            stderr: String::new(),
            exit_code: 0,
            duration: Duration::from_millis(10),
        };

        assert!(result.entry_names().unwrap().is_empty());
    }
}
