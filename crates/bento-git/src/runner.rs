//! Git command execution.
//!
//! Provides a thin wrapper around `git` subprocess invocation so that the
//! lifecycle operations do not deal with `std::process::Command` directly.
//! Execution goes through the [`CommandRunner`] trait; tests substitute a
//! scripted fake, production code uses [`GitRunner`].
//!
//! Commands always take an argument list, never an interpolated command
//! string, so caller-supplied values (remote URLs in particular) cannot
//! smuggle extra shell words into the invocation.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when running git commands.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be found or spawned.
    #[error("failed to execute git: {0}")]
    SpawnError(#[from] std::io::Error),

    /// The git command exited with a non-zero status.
    #[error("git command failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// The content of stderr.
        stderr: String,
    },
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

// ---------------------------------------------------------------------------
// Command runner
// ---------------------------------------------------------------------------

/// Captured output of a successfully exited git command.
///
/// Both streams are lossy-decoded and trimmed. `stderr` is kept even on
/// success because repository detection treats "succeeded but warned" as
/// not-a-repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Trimmed stdout.
    pub stdout: String,
    /// Trimmed stderr.
    pub stderr: String,
}

/// Capability to run a git subcommand and capture its output.
pub trait CommandRunner {
    /// Run the configured binary with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::SpawnError`] if the binary cannot be spawned, or
    /// [`GitError::CommandFailed`] if it exits with a non-zero status.
    fn run(&self, args: &[&str]) -> Result<CommandOutput>;
}

/// Production [`CommandRunner`] that spawns the git binary on the PATH
/// against an explicit working directory.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: String,
    workdir: PathBuf,
}

impl GitRunner {
    /// Create a runner for the given working directory, using `git` from
    /// the PATH.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self::with_program("git", workdir)
    }

    /// Create a runner with an explicit binary name or path.
    pub fn with_program(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
        }
    }

    /// The directory commands run in.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl CommandRunner for GitRunner {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        debug!(program = %self.program, ?args, workdir = %self.workdir.display(), "running git command");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GitError::CommandFailed {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_version() {
        // `git --version` should succeed on any system with git installed.
        let runner = GitRunner::new(".");
        let result = runner.run(&["--version"]);
        assert!(result.is_ok(), "git --version failed: {result:?}");
        let output = result.unwrap();
        assert!(
            output.stdout.starts_with("git version"),
            "unexpected output: {}",
            output.stdout
        );
    }

    #[test]
    fn test_run_failure() {
        // An invalid git subcommand should fail.
        let runner = GitRunner::new(".");
        let result = runner.run(&["not-a-real-subcommand"]);
        assert!(result.is_err());
        match result.unwrap_err() {
            GitError::CommandFailed { code, stderr } => {
                assert!(code.is_some());
                assert!(!stderr.is_empty());
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_run_bad_workdir() {
        // Running git in a nonexistent directory should fail.
        let runner = GitRunner::new("/nonexistent/directory/xyz");
        let result = runner.run(&["status"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let runner = GitRunner::with_program("definitely-not-git-xyz", ".");
        match runner.run(&["--version"]) {
            Err(GitError::SpawnError(_)) => {}
            other => panic!("expected SpawnError, got: {other:?}"),
        }
    }
}
