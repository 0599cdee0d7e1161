//! Released-tag lookup against the template repository's refs API.
//!
//! A single GET against the tag-references endpoint, one call per lookup,
//! no caching and no retries. Tag selection is plain lexicographic string
//! ordering by contract: `v10.0.0` sorts before `v2.0.0`, and that is the
//! behavior callers depend on, not a bug to fix with semver comparison.

use bento_config::TemplateConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Prefix that marks a ref as a tag reference.
const TAG_REF_PREFIX: &str = "refs/tags/";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while looking up the latest released tag.
#[derive(Debug, Error)]
pub enum TagError {
    /// The HTTP request failed or returned a non-success status.
    #[error("tag request failed: {0}")]
    Http(#[from] ureq::Error),

    /// The response body was not the expected refs listing.
    #[error("failed to parse tag listing: {0}")]
    Parse(#[from] serde_json::Error),

    /// The template repository has no tags at all.
    #[error("template repository has no released tags")]
    NoTags,
}

/// A specialized `Result` type for tag operations.
pub type Result<T> = std::result::Result<T, TagError>;

// ---------------------------------------------------------------------------
// Refs fetching
// ---------------------------------------------------------------------------

/// Capability to fetch the raw tag-references listing.
pub trait RefsFetcher {
    /// GET `url`, identifying as `user_agent`, and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Http`] on transport failure or a non-success
    /// status.
    fn fetch(&self, url: &str, user_agent: &str) -> Result<String>;
}

/// Production [`RefsFetcher`] backed by a blocking ureq GET.
#[derive(Debug, Clone, Default)]
pub struct GithubRefsFetcher;

impl RefsFetcher for GithubRefsFetcher {
    fn fetch(&self, url: &str, user_agent: &str) -> Result<String> {
        debug!(url, user_agent, "fetching tag refs");
        let mut response = ureq::get(url).header("User-Agent", user_agent).call()?;
        let body = response.body_mut().read_to_string()?;
        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Tag selection
// ---------------------------------------------------------------------------

/// One entry of the refs listing; only the `ref` field matters.
#[derive(Debug, Deserialize)]
struct TagRef {
    #[serde(rename = "ref")]
    name: String,
}

/// Fetch the template repository's tag refs and return the latest tag name.
///
/// "Latest" means the lexicographically greatest bare tag name (the
/// `refs/tags/` prefix stripped), matching the established contract of the
/// scaffolding tool.
///
/// # Errors
///
/// Returns [`TagError::Http`] on request failure, [`TagError::Parse`] if
/// the body is not a refs listing, and [`TagError::NoTags`] if the listing
/// is empty.
pub fn latest_tag(fetcher: &impl RefsFetcher, config: &TemplateConfig) -> Result<String> {
    let body = fetcher.fetch(&config.tags_url(), &config.user_agent)?;
    let refs: Vec<TagRef> = serde_json::from_str(&body)?;

    let mut tags: Vec<String> = refs
        .into_iter()
        .map(|r| {
            r.name
                .strip_prefix(TAG_REF_PREFIX)
                .unwrap_or(&r.name)
                .to_string()
        })
        .collect();
    tags.sort();

    debug!(count = tags.len(), "fetched tag refs");
    tags.pop().ok_or(TagError::NoTags)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Fetcher that returns a canned body and records the request it saw.
    struct FakeFetcher {
        body: String,
        seen: RefCell<Vec<(String, String)>>,
    }

    impl FakeFetcher {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl RefsFetcher for FakeFetcher {
        fn fetch(&self, url: &str, user_agent: &str) -> Result<String> {
            self.seen
                .borrow_mut()
                .push((url.to_string(), user_agent.to_string()));
            Ok(self.body.clone())
        }
    }

    fn refs_body(names: &[&str]) -> String {
        let entries: Vec<String> = names
            .iter()
            .map(|n| format!(r#"{{"ref": "{n}", "object": {{"type": "commit"}}}}"#))
            .collect();
        format!("[{}]", entries.join(","))
    }

    #[test]
    fn test_latest_tag_picks_string_max() {
        let fetcher = FakeFetcher::new(&refs_body(&[
            "refs/tags/v1.0.0",
            "refs/tags/v2.0.0",
            "refs/tags/v1.5.0",
        ]));
        let tag = latest_tag(&fetcher, &TemplateConfig::default()).unwrap();
        assert_eq!(tag, "v2.0.0");
    }

    #[test]
    fn test_latest_tag_is_lexicographic_not_semver() {
        // v10 sorts before v9 under byte-wise ordering; this is the contract.
        let fetcher = FakeFetcher::new(&refs_body(&["refs/tags/v9.0.0", "refs/tags/v10.0.0"]));
        let tag = latest_tag(&fetcher, &TemplateConfig::default()).unwrap();
        assert_eq!(tag, "v9.0.0");
    }

    #[test]
    fn test_latest_tag_empty_listing_fails() {
        let fetcher = FakeFetcher::new("[]");
        let result = latest_tag(&fetcher, &TemplateConfig::default());
        assert!(matches!(result, Err(TagError::NoTags)));
    }

    #[test]
    fn test_latest_tag_malformed_body_fails() {
        let fetcher = FakeFetcher::new("<!DOCTYPE html>");
        let result = latest_tag(&fetcher, &TemplateConfig::default());
        assert!(matches!(result, Err(TagError::Parse(_))));
    }

    #[test]
    fn test_latest_tag_requests_configured_endpoint() {
        let fetcher = FakeFetcher::new(&refs_body(&["refs/tags/v1.0.0"]));
        latest_tag(&fetcher, &TemplateConfig::default()).unwrap();

        let seen = fetcher.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].0,
            "https://api.github.com/repos/kefranabg/bento-starter/git/refs/tags"
        );
        assert_eq!(seen[0].1, "bento-start-app");
    }

    #[test]
    fn test_unprefixed_ref_is_kept_verbatim() {
        // A ref without the tag prefix should not be dropped or mangled.
        let fetcher = FakeFetcher::new(&refs_body(&["v1.0.0"]));
        let tag = latest_tag(&fetcher, &TemplateConfig::default()).unwrap();
        assert_eq!(tag, "v1.0.0");
    }
}
