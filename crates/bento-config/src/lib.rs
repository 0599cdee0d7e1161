//! Configuration for the bento scaffolding tool.
//!
//! This crate holds the identity of the canonical template repository
//! (owner, name, API endpoint, client identifier) and the loading/saving
//! of `bento.yaml` files. The git lifecycle helper reads everything it
//! needs about the upstream template from here instead of hard-coding
//! URLs or executable names.

pub mod config;

pub use config::{ConfigError, TemplateConfig, load_config, save_config};
