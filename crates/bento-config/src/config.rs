//! Template repository configuration types and loading.
//!
//! The main entry point is [`TemplateConfig`], which describes the canonical
//! template repository a generated project was scaffolded from. Configuration
//! is loaded with [`load_config`] and saved with [`save_config`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The name of the configuration file inside a config directory.
const CONFIG_FILE_NAME: &str = "bento.yaml";

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// Identity of the canonical template repository and related settings.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// is deserialized correctly, with the canonical bento-starter identity
/// filling in whatever is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Owner of the template repository on the hosting service.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Name of the template repository.
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Base URL of the hosting service's REST API.
    #[serde(default = "default_api_base", rename = "api-base")]
    pub api_base: String,

    /// Client identifier sent as the `User-Agent` header on API requests.
    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,

    /// Message used for the initial commit of a freshly generated project.
    #[serde(default = "default_commit_message", rename = "commit-message")]
    pub commit_message: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            commit_message: default_commit_message(),
        }
    }
}

fn default_owner() -> String {
    "kefranabg".to_string()
}

fn default_repo() -> String {
    "bento-starter".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "bento-start-app".to_string()
}

fn default_commit_message() -> String {
    ":tada: Initial commit".to_string()
}

// ---------------------------------------------------------------------------
// Helper methods on TemplateConfig
// ---------------------------------------------------------------------------

impl TemplateConfig {
    /// The tag-references listing endpoint for the template repository.
    pub fn tags_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/git/refs/tags",
            self.api_base, self.owner, self.repo
        )
    }

    /// The substring that identifies a remote line as pointing at the
    /// template repository (owner, name, and `.git` suffix).
    pub fn clone_fingerprint(&self) -> String {
        format!("{}/{}.git", self.owner, self.repo)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `bento.yaml` inside the given directory.
///
/// If the file does not exist, a default [`TemplateConfig`] is returned.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// or [`ConfigError::ParseError`] if it contains invalid YAML.
pub fn load_config(dir: &Path) -> Result<TemplateConfig> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return Ok(TemplateConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)?;

    // An empty file is valid and yields default config.
    if content.trim().is_empty() {
        return Ok(TemplateConfig::default());
    }

    let config: TemplateConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to `bento.yaml` inside the given directory.
///
/// The directory is created if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] on I/O failure or
/// [`ConfigError::ParseError`] if serialization fails.
pub fn save_config(dir: &Path, config: &TemplateConfig) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let config_path = dir.join(CONFIG_FILE_NAME);
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
