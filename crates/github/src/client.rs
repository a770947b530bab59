//! [`TeamsApi`] over the GitHub REST API.

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, ETAG, IF_NONE_MATCH,
};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use provider::{
    ApiError, Conditional, ETag, Membership, OrgName, Team, TeamId, TeamRequest, TeamRole,
    TeamsApi,
};

use crate::config::ClientConfig;
use crate::errors::ClientError;

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: HeaderName = HeaderName::from_static("x-github-api-version");

/// Body of a GitHub error response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Body of an add-membership request.
#[derive(Debug, Serialize)]
struct MembershipRequest {
    role: TeamRole,
}

/// HTTP client for the team endpoints.
///
/// Holds no per-request state: conditional-read preconditions arrive as
/// arguments, so one instance can be shared across tasks.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    base: Url,
}

impl GithubClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the base URL is not `http(s)`, the token or
    /// API version cannot be encoded as header values, or the HTTP stack
    /// fails to initialise.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/');
        let invalid_base = || ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
        };
        let base = Url::parse(base_url).map_err(|_| invalid_base())?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(invalid_base());
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        headers.insert(
            API_VERSION_HEADER,
            HeaderValue::from_str(&config.api_version).map_err(|_| ClientError::InvalidHeader {
                header: "X-GitHub-Api-Version",
            })?,
        );
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidHeader {
                    header: "Authorization",
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            base,
        })
    }

    /// The API root all request paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one so that
    /// `/`, `?` and `#` inside a value never change the addressed endpoint.
    ///
    /// Empty, `.` and `..` segments are rejected; no request is built for them.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ApiError::InvalidPathSegment {
                segment: bad.to_string(),
            });
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidPathSegment {
                segment: self.base_url.clone(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(request: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(transport_error)?;
        error_for_status(response, path).await
    }

    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        Self::send(request, path)
            .await?
            .json()
            .await
            .map_err(decode_error)
    }

    async fn get_conditional<T: DeserializeOwned>(
        &self,
        url: Url,
        if_none_match: Option<&ETag>,
    ) -> Result<Conditional<T>, ApiError> {
        let path = url.path().to_string();
        let mut request = self.http.get(url);
        if let Some(etag) = if_none_match {
            request = request.header(IF_NONE_MATCH, etag.as_str());
        }

        let response = request.send().await.map_err(transport_error)?;
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .and_then(ETag::new);

        if response.status() == StatusCode::NOT_MODIFIED {
            debug!(path = %path, "Not modified");
            return Ok(Conditional::NotModified { etag });
        }

        let value = error_for_status(response, &path)
            .await?
            .json()
            .await
            .map_err(decode_error)?;
        Ok(Conditional::Modified { value, etag })
    }
}

async fn error_for_status(response: Response, path: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound {
            resource: path.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string(),
        Err(_) => body,
    };
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport {
        message: err.to_string(),
    }
}

fn decode_error(err: reqwest::Error) -> ApiError {
    ApiError::Decode {
        message: err.to_string(),
    }
}

#[async_trait]
impl TeamsApi for GithubClient {
    #[instrument(level = "debug", skip(self, team), fields(name = %team.name))]
    async fn create_team(&self, org: &OrgName, team: &TeamRequest) -> Result<Team, ApiError> {
        let url = self.endpoint(&["orgs", org.as_str(), "teams"])?;
        let path = url.path().to_string();
        Self::send_json(self.http.post(url).json(team), &path).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_team(
        &self,
        id: TeamId,
        if_none_match: Option<&ETag>,
    ) -> Result<Conditional<Team>, ApiError> {
        let url = self.endpoint(&["teams", &id.to_string()])?;
        self.get_conditional(url, if_none_match).await
    }

    #[instrument(level = "debug", skip(self, team))]
    async fn edit_team(&self, id: TeamId, team: &Team) -> Result<Team, ApiError> {
        let url = self.endpoint(&["teams", &id.to_string()])?;
        let path = url.path().to_string();
        let body = team.to_request();
        Self::send_json(self.http.patch(url).json(&body), &path).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_team(&self, id: TeamId) -> Result<(), ApiError> {
        let url = self.endpoint(&["teams", &id.to_string()])?;
        let path = url.path().to_string();
        Self::send(self.http.delete(url), &path).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn add_team_membership(
        &self,
        team_id: TeamId,
        username: &str,
        role: TeamRole,
    ) -> Result<Membership, ApiError> {
        let url = self.endpoint(&["teams", &team_id.to_string(), "memberships", username])?;
        let path = url.path().to_string();
        let body = MembershipRequest { role };
        Self::send_json(self.http.put(url).json(&body), &path).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_team_membership(
        &self,
        team_id: TeamId,
        username: &str,
        if_none_match: Option<&ETag>,
    ) -> Result<Conditional<Membership>, ApiError> {
        let url = self.endpoint(&["teams", &team_id.to_string(), "memberships", username])?;
        self.get_conditional(url, if_none_match).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn remove_team_membership(&self, team_id: TeamId, username: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["teams", &team_id.to_string(), "memberships", username])?;
        let path = url.path().to_string();
        Self::send(self.http.delete(url), &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = GithubClient::new(&ClientConfig::new("api.github.com")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let client = GithubClient::new(&ClientConfig::new("https://ghe.example.com/api/v3/")).unwrap();
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
        assert_eq!(
            client.endpoint(&["teams", "1"]).unwrap().as_str(),
            "https://ghe.example.com/api/v3/teams/1"
        );
    }

    #[test]
    fn endpoint_keeps_each_value_in_one_segment() {
        let client = GithubClient::new(&ClientConfig::new("https://api.github.com")).unwrap();
        let url = client
            .endpoint(&["teams", "1", "memberships", "x/../../teams/5?a=b#c"])
            .unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 4);
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(
            url.path(),
            "/teams/1/memberships/x%2F..%2F..%2Fteams%2F5%3Fa=b%23c"
        );
    }

    #[test]
    fn endpoint_rejects_dot_and_empty_segments() {
        let client = GithubClient::new(&ClientConfig::new("https://api.github.com")).unwrap();
        for bad in ["..", ".", ""] {
            assert_eq!(
                client.endpoint(&["teams", "1", "memberships", bad]).unwrap_err(),
                ApiError::InvalidPathSegment {
                    segment: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn rejects_token_with_newline() {
        let config = ClientConfig::default().with_token("abc\ndef");
        let err = GithubClient::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { header: "Authorization" }));
    }

    #[test]
    fn timeout_defaults_are_applied() {
        assert_eq!(ClientConfig::default().timeout, Duration::from_secs(30));
    }
}
