//! Git lifecycle management for freshly generated bento projects.
//!
//! This crate is the helper a scaffolding CLI composes in a fixed workflow:
//! detect whether the generated directory is under version control, detect
//! whether it is a clone of the canonical template repository, strip and
//! reinitialize the repository, perform the initial commit, rewrite the
//! `origin` remote, and sync the working tree to the latest released tag
//! of the template.
//!
//! Every operation is a thin wrapper around a `git` subprocess invocation
//! or a single HTTP request; no state is retained between calls beyond
//! what the repository itself stores on disk. The subprocess and HTTP
//! capabilities are injected ([`runner::CommandRunner`],
//! [`tags::RefsFetcher`]) so tests can substitute fakes.

pub mod lifecycle;
pub mod runner;
pub mod tags;

pub use lifecycle::{LifecycleError, RepoLifecycle};
pub use runner::{CommandOutput, CommandRunner, GitError, GitRunner};
pub use tags::{GithubRefsFetcher, RefsFetcher, TagError};
