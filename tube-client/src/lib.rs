//! Tube GitHub Client
//!
//! A small, type-safe HTTP client for the parts of the GitHub REST API the
//! pipeline builder and its resources use: repository webhooks and releases.
//!
//! List endpoints return one [`Page`] at a time. Callers walk pages by
//! following [`Page::next_page`] until it is `None`.
//!
//! # Example
//!
//! ```no_run
//! use tube_client::GitHubClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GitHubClient::new("https://api.github.com")
//!         .with_credentials("octocat", "ghp_token");
//!
//!     let page = client.list_hooks("octocat", "hello-world", 1).await?;
//!     for hook in page.items {
//!         println!("{} {}", hook.id, hook.url());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod hooks;
mod releases;

pub use error::{ClientError, Result};
pub use hooks::{Hook, HookConfig};
pub use releases::{Release, ReleaseAsset};

use reqwest::header::{ACCEPT, HeaderMap, LINK, USER_AGENT};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size requested from every list endpoint
pub const PER_PAGE: u32 = 100;

const MEDIA_TYPE: &str = "application/vnd.github+json";
const AGENT: &str = concat!("tube/", env!("CARGO_PKG_VERSION"));

/// One page of a paginated list response
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page number to request next, if the API reported one
    pub next_page: Option<u32>,
}

/// HTTP client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// Username and access token for basic authentication
    credentials: Option<(String, String)>,
    /// HTTP client instance
    client: Client,
}

impl GitHubClient {
    /// Create a new unauthenticated client
    ///
    /// # Example
    /// ```
    /// use tube_client::GitHubClient;
    ///
    /// let client = GitHubClient::new("https://api.github.com/");
    /// assert_eq!(client.base_url(), "https://api.github.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
            client,
        }
    }

    /// Authenticate every request with a username and access token
    pub fn with_credentials(mut self, username: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), token.into()));
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach the headers and credentials every request carries
    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, MEDIA_TYPE).header(USER_AGENT, AGENT);

        match &self.credentials {
            Some((username, token)) => request.basic_auth(username, Some(token)),
            None => request,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and return the body text of a failed response
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)
    }

    /// Handle a list response, reading the next page from the `Link` header
    async fn handle_page<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<Page<T>> {
        let response = Self::check_status(response).await?;
        let next_page = next_page(response.headers());

        let items = response
            .json()
            .await
            .map_err(ClientError::Decode)?;

        Ok(Page { items, next_page })
    }
}

/// Extracts the `page` query parameter of the `rel="next"` link
fn next_page(headers: &HeaderMap) -> Option<u32> {
    let link = headers.get(LINK)?.to_str().ok()?;

    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == r#"rel="next""#) {
            return None;
        }

        let target = target.trim().trim_start_matches('<').trim_end_matches('>');
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new("https://api.github.com");
        assert_eq!(client.base_url(), "https://api.github.com");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GitHubClient::new("https://github.example.com/api/v3/");
        assert_eq!(client.base_url(), "https://github.example.com/api/v3");
    }

    #[test]
    fn test_next_page_from_link_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/repositories/1/hooks?per_page=100&page=3>; rel="next", <https://api.github.com/repositories/1/hooks?per_page=100&page=5>; rel="last""#,
            ),
        );

        assert_eq!(next_page(&headers), Some(3));
    }

    #[test]
    fn test_no_next_page_on_last_page() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/repositories/1/hooks?per_page=100&page=1>; rel="first", <https://api.github.com/repositories/1/hooks?per_page=100&page=4>; rel="prev""#,
            ),
        );

        assert_eq!(next_page(&headers), None);
        assert_eq!(next_page(&HeaderMap::new()), None);
    }
}
