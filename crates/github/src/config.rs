//! Connection settings for [`crate::GithubClient`].

use std::time::Duration;

/// Public GitHub REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// REST API version requested via `X-GitHub-Api-Version`.
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How to reach and authenticate against the GitHub REST API.
#[derive(Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.github.com` or a GHES `https://host/api/v3`.
    pub base_url: String,
    /// Personal access or installation token. `None` sends no credentials.
    pub token: Option<String>,
    /// `User-Agent` header; GitHub rejects requests without one.
    pub user_agent: String,
    /// Value of the `X-GitHub-Api-Version` header.
    pub api_version: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for `base_url` with everything else at its default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            user_agent: concat!("gh-teams/", env!("CARGO_PKG_VERSION")).to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Hand-written so the token never reaches logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
