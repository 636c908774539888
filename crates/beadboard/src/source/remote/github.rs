//! GitHub REST implementation of [`ContentApi`].

use super::{ContentApi, RemoteRepository};
use crate::config::{DEFAULT_API_URL, MAX_PER_PAGE, RemoteConfig};
use crate::error::{Error, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// An opaque API credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a credential.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if the credential is blank.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::Unauthorized("no usable access token".to_string()));
        }
        Ok(Self(token))
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Client for the GitHub repository and contents endpoints.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: AccessToken,
    per_page: u32,
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be constructed.
    pub fn new(token: AccessToken) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("beadboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_API_URL.to_string(),
            token,
            per_page: MAX_PER_PAGE,
        })
    }

    /// Create a client from remote configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(token: AccessToken, config: &RemoteConfig) -> Result<Self> {
        Ok(Self::new(token)?
            .with_base_url(&config.api_url)
            .with_per_page(config.effective_per_page()))
    }

    /// Point the client at a different API root (GitHub Enterprise, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the enumeration page size, capped at the API maximum.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.http
            .get(url)
            .bearer_auth(self.token.expose())
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION)
    }

    async fn get_contents(
        &self,
        repo: &RemoteRepository,
        path: &str,
    ) -> Result<Option<ContentsPayload>> {
        let url = format!(
            "{}/repos/{}/{}/contents/{path}",
            self.base_url, repo.owner, repo.name
        );
        let response = self.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response, &url)?;
        Ok(Some(response.json().await?))
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        let response = ensure_success(self.get(url).send().await?, url)?;
        let bytes = response.bytes().await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::Remote(format!("{url} is not valid UTF-8")))
    }
}

#[async_trait]
impl ContentApi for GitHubClient {
    async fn list_repositories(&self) -> Result<Vec<RemoteRepository>> {
        let url = format!("{}/user/repos", self.base_url);
        let per_page = self.per_page.to_string();
        let mut repositories = Vec::new();
        let mut page: u32 = 1;

        loop {
            let response = self
                .get(&url)
                .query(&[
                    ("per_page", per_page.as_str()),
                    ("sort", "updated"),
                    ("direction", "desc"),
                    ("page", page.to_string().as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            if is_rate_limited(&response) {
                return Err(Error::Remote(format!(
                    "repository listing rate limited with {status}"
                )));
            }
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(Error::Unauthorized(format!(
                    "repository listing rejected with {status}"
                )));
            }
            let batch: Vec<RepositoryPayload> = ensure_success(response, &url)?.json().await?;
            let batch_len = batch.len();
            debug!(page, count = batch_len, "Fetched repository page");

            repositories.extend(batch.into_iter().map(RemoteRepository::from));
            if batch_len < self.per_page as usize {
                break;
            }
            page += 1;
        }

        Ok(repositories)
    }

    async fn list_directory(
        &self,
        repo: &RemoteRepository,
        path: &str,
    ) -> Result<Option<Vec<String>>> {
        match self.get_contents(repo, path).await? {
            Some(ContentsPayload::Directory(entries)) => {
                Ok(Some(entries.into_iter().map(|e| e.name).collect()))
            }
            Some(ContentsPayload::File(_)) | None => Ok(None),
        }
    }

    async fn fetch_text(&self, repo: &RemoteRepository, path: &str) -> Result<Option<String>> {
        match self.get_contents(repo, path).await? {
            None => Ok(None),
            Some(ContentsPayload::Directory(_)) => Err(Error::Remote(format!(
                "{path} in {} is a directory",
                repo.full_name()
            ))),
            Some(ContentsPayload::File(file)) => match file.encoding.as_deref() {
                Some("base64") => decode_base64_content(&file.content).map(Some),
                _ => match file.download_url {
                    // Files too large to inline come back without content.
                    Some(url) => self.fetch_raw(&url).await.map(Some),
                    None => Err(Error::Remote(format!(
                        "{path} in {} has no retrievable content",
                        repo.full_name()
                    ))),
                },
            },
        }
    }
}

/// A 403 or 429 that reports an exhausted rate-limit window.
fn is_rate_limited(response: &Response) -> bool {
    let status = response.status();
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return false;
    }
    response
        .headers()
        .get(RATE_LIMIT_REMAINING_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|remaining| remaining.trim() == "0")
}

fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Remote(format!("GET {url} returned {status}")))
    }
}

/// Decode a contents-API payload. The API wraps base64 at 60 columns.
pub(crate) fn decode_base64_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| Error::Remote(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|_| Error::Remote("content is not valid UTF-8".to_string()))
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    html_url: String,
    owner: OwnerPayload,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

impl From<RepositoryPayload> for RemoteRepository {
    fn from(payload: RepositoryPayload) -> Self {
        Self {
            owner: payload.owner.login,
            name: payload.name,
            html_url: payload.html_url,
        }
    }
}

/// The contents endpoint answers with an array for directories and an object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsPayload {
    Directory(Vec<EntryPayload>),
    File(FilePayload),
}

#[derive(Debug, Deserialize)]
struct EntryPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FilePayload {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_unauthorized() {
        assert!(matches!(AccessToken::new("  "), Err(Error::Unauthorized(_))));
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("ghp_secret").unwrap();
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn decodes_wrapped_base64() {
        // "{\"a\":1}\n" split across lines the way the API returns it
        let decoded = decode_base64_content("eyJhIjox\nfQo=\n").unwrap();
        assert_eq!(decoded, "{\"a\":1}\n");
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_base64_content("!!!not base64"),
            Err(Error::Remote(_))
        ));
    }

    #[test]
    fn rejects_non_utf8_payload() {
        // 0xff 0xfe
        assert!(matches!(decode_base64_content("//4="), Err(Error::Remote(_))));
    }

    #[test]
    fn contents_payload_distinguishes_files_and_directories() {
        let dir: ContentsPayload =
            serde_json::from_str(r#"[{"name":"issues.jsonl","type":"file"}]"#).unwrap();
        let file: ContentsPayload =
            serde_json::from_str(r#"{"name":"issues.jsonl","content":"","encoding":"base64"}"#)
                .unwrap();

        assert!(matches!(dir, ContentsPayload::Directory(ref e) if e[0].name == "issues.jsonl"));
        assert!(matches!(file, ContentsPayload::File(_)));
    }

    #[test]
    fn per_page_is_capped() {
        let client = GitHubClient::new(AccessToken::new("t").unwrap())
            .unwrap()
            .with_per_page(1000)
            .with_base_url("http://localhost:1/");

        assert_eq!(client.per_page, MAX_PER_PAGE);
        assert_eq!(client.base_url, "http://localhost:1");
    }
}
