/// Source-host repository listing client.
///
/// Reads the first page of `GET <base>/users/<username>/repos` sorted by last
/// update. No pagination: anything past `per_page` repositories is ignored.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::cancel::CancelToken;
use super::error::{StatsError, StatsResult, from_ureq};
use crate::config::FolioConfig;

pub const REPOS_ENDPOINT: &str = "source-host-repos";

/// Repository summary as returned by the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    /// Primary language; `null` for repos the host could not classify.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

#[derive(Debug, Clone)]
pub struct SourceHostClient {
    base_url: String,
    username: String,
    per_page: u32,
    timeout: Duration,
}

impl SourceHostClient {
    pub fn from_config(config: &FolioConfig) -> Self {
        Self {
            base_url: config.source_host.base_url.trim_end_matches('/').to_string(),
            username: config.identity.source_host_username.clone(),
            per_page: config.source_host.per_page,
            timeout: Duration::from_millis(config.source_host.timeout_ms),
        }
    }

    pub fn repos_url(&self) -> String {
        format!(
            "{}/users/{}/repos?per_page={}&sort=updated",
            self.base_url, self.username, self.per_page
        )
    }

    /// Fetch the first page of repositories.
    pub fn repositories(&self, cancel: &CancelToken) -> StatsResult<Vec<Repository>> {
        let resp = ureq::get(&self.repos_url())
            .set("Accept", "application/vnd.github+json")
            .timeout(cancel.clamp(self.timeout))
            .call()
            .map_err(|e| from_ureq(REPOS_ENDPOINT, e))?;

        resp.into_json()
            .map_err(|e| StatsError::malformed(REPOS_ENDPOINT, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repos_url_has_fixed_query() {
        let client = SourceHostClient::from_config(&FolioConfig::default());
        assert_eq!(
            client.repos_url(),
            "https://api.github.com/users/waougri/repos?per_page=100&sort=updated"
        );
    }

    #[test]
    fn repository_tolerates_null_language_and_extra_fields() {
        let json = r#"[
            { "name": "a", "language": null, "stargazers_count": 1, "forks_count": 0, "private": false },
            { "name": "b", "language": "Rust" }
        ]"#;
        let repos: Vec<Repository> = serde_json::from_str(json).unwrap();
        assert_eq!(repos[0].language, None);
        assert_eq!(repos[0].stargazers_count, 1);
        assert_eq!(repos[1].language.as_deref(), Some("Rust"));
        assert_eq!(repos[1].stargazers_count, 0);
    }
}
