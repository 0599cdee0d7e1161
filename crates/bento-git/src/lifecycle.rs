//! Lifecycle operations on a generated project's git repository.
//!
//! [`RepoLifecycle`] exposes the independent steps the scaffolding CLI
//! composes in its fixed workflow: detect -> decide -> clean -> init ->
//! commit -> set-origin, plus the latest-tag query/sync pair. Each
//! operation is a single subprocess invocation or HTTP request; nothing is
//! cached across calls. Operations that mutate the same working directory
//! must be serialized by the caller.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use bento_config::TemplateConfig;
use thiserror::Error;
use tracing::debug;

use crate::runner::{CommandRunner, GitError, GitRunner};
use crate::tags::{self, GithubRefsFetcher, RefsFetcher, TagError};

/// The repository metadata directory, relative to the working directory.
const GIT_DIR_NAME: &str = ".git";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from lifecycle operations that span more than one capability.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A git command failed.
    #[error("git operation failed: {0}")]
    Git(#[from] GitError),

    /// The latest-tag lookup failed.
    #[error("tag lookup failed: {0}")]
    Tags(#[from] TagError),

    /// The `.git` directory could not be removed.
    #[error("failed to remove .git directory: {0}")]
    Filesystem(std::io::Error),
}

/// A specialized `Result` type for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;

// ---------------------------------------------------------------------------
// RepoLifecycle
// ---------------------------------------------------------------------------

/// Git lifecycle helper bound to one working directory and one template
/// repository identity.
///
/// The working directory is explicit rather than ambient process state, so
/// several repositories can be managed within one process and tests can run
/// in isolated temporary directories.
pub struct RepoLifecycle<R: CommandRunner, F: RefsFetcher> {
    runner: R,
    fetcher: F,
    workdir: PathBuf,
    config: TemplateConfig,
}

impl RepoLifecycle<GitRunner, GithubRefsFetcher> {
    /// Create a helper using the ambient `git` binary and the GitHub refs
    /// API, operating on `workdir`.
    pub fn new(workdir: impl Into<PathBuf>, config: TemplateConfig) -> Self {
        let workdir = workdir.into();
        Self {
            runner: GitRunner::new(workdir.clone()),
            fetcher: GithubRefsFetcher,
            workdir,
            config,
        }
    }
}

impl<R: CommandRunner, F: RefsFetcher> RepoLifecycle<R, F> {
    /// Create a helper from explicit capabilities. Used by tests to inject
    /// scripted runners and fetchers.
    pub fn with_parts(
        runner: R,
        fetcher: F,
        workdir: impl Into<PathBuf>,
        config: TemplateConfig,
    ) -> Self {
        Self {
            runner,
            fetcher,
            workdir: workdir.into(),
            config,
        }
    }

    /// Whether the working directory is under git version control.
    ///
    /// True only when `git status` succeeds and produces no stderr output.
    /// Absence of a repository is a normal outcome, so every failure mode
    /// of the invocation collapses to `false`; this never errors.
    pub fn has_git_repository(&self) -> bool {
        match self.runner.run(&["status"]) {
            Ok(output) => output.stderr.is_empty(),
            Err(_) => false,
        }
    }

    /// Whether the repository's `origin` remote points at the template
    /// repository.
    ///
    /// Inspects `git remote -v` line by line: lines that start with the
    /// literal `origin` after trimming are checked for the template's
    /// fingerprint (`owner/repo.git`).
    ///
    /// # Errors
    ///
    /// Fails with [`GitError::CommandFailed`] outside a repository; call
    /// [`has_git_repository`](Self::has_git_repository) first.
    pub fn is_template_clone(&self) -> crate::runner::Result<bool> {
        let output = self.runner.run(&["remote", "-v"])?;
        let fingerprint = self.config.clone_fingerprint();

        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("origin"))
            .any(|line| line.contains(&fingerprint)))
    }

    /// Whether the repository is eligible for having its history stripped:
    /// it exists and is a clone of the template.
    ///
    /// Never errors: short-circuits to `false` without a repository, and a
    /// failing clone check also yields `false`.
    pub fn is_cleanable(&self) -> bool {
        self.has_git_repository() && self.is_template_clone().unwrap_or(false)
    }

    /// Recursively delete the repository's `.git` directory.
    ///
    /// An already-absent `.git` counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Filesystem`] if the deletion cannot
    /// complete.
    pub fn remove_git_repository(&self) -> Result<()> {
        let git_dir = self.workdir.join(GIT_DIR_NAME);
        debug!(path = %git_dir.display(), "removing git metadata directory");

        match fs::remove_dir_all(&git_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LifecycleError::Filesystem(e)),
        }
    }

    /// Initialize a fresh repository in the working directory.
    ///
    /// # Errors
    ///
    /// Fails if the git binary is unavailable or the directory is not
    /// writable.
    pub fn init_git_repository(&self) -> crate::runner::Result<()> {
        self.runner.run(&["init"])?;
        Ok(())
    }

    /// Stage everything and create the initial commit with the configured
    /// fixed message.
    ///
    /// No author handling: if git requires an identity and none is
    /// configured, the commit fails with the underlying
    /// [`GitError::CommandFailed`].
    pub fn initial_commit(&self) -> crate::runner::Result<()> {
        self.runner.run(&["add", "."])?;
        self.runner.run(&["commit", "-m", &self.config.commit_message])?;
        Ok(())
    }

    /// Add a remote named `origin` pointing at the given URL.
    ///
    /// The URL is passed as a single argument, never interpolated into a
    /// shell string. Not validated for well-formedness.
    ///
    /// # Errors
    ///
    /// Fails if an `origin` remote already exists or git rejects the URL.
    pub fn change_origin(&self, origin: &str) -> crate::runner::Result<()> {
        self.runner.run(&["remote", "add", "origin", origin])?;
        Ok(())
    }

    /// Look up the latest released tag of the template repository.
    ///
    /// # Errors
    ///
    /// See [`tags::latest_tag`].
    pub fn latest_tag(&self) -> tags::Result<String> {
        tags::latest_tag(&self.fetcher, &self.config)
    }

    /// Fetch and hard-reset the working tree to the latest released tag.
    ///
    /// Destructive: discards uncommitted changes and any history beyond
    /// the tag. If the reset fails after the fetch, the repository is left
    /// in whatever state the fetch produced; no compensation is attempted.
    pub fn checkout_to_last_tag(&self) -> Result<()> {
        let tag = self.latest_tag()?;
        debug!(tag = %tag, "resetting working tree to latest released tag");

        self.runner.run(&["fetch"])?;
        self.runner
            .run(&["reset", "--hard", &format!("tags/{tag}")])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
