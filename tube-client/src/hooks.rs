//! Repository webhook endpoints

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::{GitHubClient, PER_PAGE, Page};

/// A webhook registered on a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub config: HookConfig,
}

impl Hook {
    /// The configured delivery URL, or `""` if the hook has none
    pub fn url(&self) -> &str {
        self.config.url.as_deref().unwrap_or_default()
    }
}

/// Delivery configuration of a webhook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl HookConfig {
    fn json(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            content_type: Some("json".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateHook {
    name: &'static str,
    active: bool,
    events: Vec<&'static str>,
    config: HookConfig,
}

#[derive(Debug, Serialize)]
struct EditHook {
    config: HookConfig,
}

impl GitHubClient {
    // =============================================================================
    // Repository Webhooks
    // =============================================================================

    /// List one page of the webhooks registered on a repository
    ///
    /// # Arguments
    /// * `owner` - Repository owner
    /// * `repository` - Repository name
    /// * `page` - 1-based page number
    pub async fn list_hooks(&self, owner: &str, repository: &str, page: u32) -> Result<Page<Hook>> {
        let url = format!("{}/repos/{}/{}/hooks", self.base_url, owner, repository);
        debug!("GET {} page {}", url, page);

        let response = self
            .prepare(self.client.get(&url))
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .send()
            .await?;

        self.handle_page(response).await
    }

    /// Create a push webhook delivering JSON to `url`
    ///
    /// # Returns
    /// The created hook
    pub async fn create_hook(&self, owner: &str, repository: &str, url: &str) -> Result<Hook> {
        let endpoint = format!("{}/repos/{}/{}/hooks", self.base_url, owner, repository);
        debug!("POST {}", endpoint);

        let request = CreateHook {
            name: "web",
            active: true,
            events: vec!["push"],
            config: HookConfig::json(url),
        };

        let response = self
            .prepare(self.client.post(&endpoint))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Point an existing webhook at a new `url`
    ///
    /// # Returns
    /// The updated hook
    pub async fn update_hook(
        &self,
        owner: &str,
        repository: &str,
        id: u64,
        url: &str,
    ) -> Result<Hook> {
        let endpoint = format!(
            "{}/repos/{}/{}/hooks/{}",
            self.base_url, owner, repository, id
        );
        debug!("PATCH {}", endpoint);

        let request = EditHook {
            config: HookConfig::json(url),
        };

        let response = self
            .prepare(self.client.patch(&endpoint))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_hooks_reads_next_page() {
        let server = MockServer::start().await;
        let next = format!(
            r#"<{}/repositories/1/hooks?per_page=100&page=2>; rel="next""#,
            server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/hooks"))
            .and(query_param("per_page", "100"))
            .and(query_param("page", "1"))
            .and(header_exists("authorization"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", next.as_str())
                    .set_body_json(json!([
                        { "id": 7, "name": "web", "active": true, "events": ["push"],
                          "config": { "url": "https://ci.example.com/hook", "content_type": "json" } },
                        { "id": 8, "name": "web", "config": {} }
                    ])),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri()).with_credentials("bot", "token");
        let page = client.list_hooks("acme", "widget", 1).await.unwrap();

        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].url(), "https://ci.example.com/hook");
        assert_eq!(page.items[1].url(), "");
    }

    #[tokio::test]
    async fn test_create_hook_sends_push_config() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/acme/widget/hooks"))
            .and(body_partial_json(json!({
                "name": "web",
                "events": ["push"],
                "config": { "url": "https://ci.example.com/hook?webhook_token=t", "content_type": "json" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 9,
                "config": { "url": "https://ci.example.com/hook?webhook_token=t" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri());
        let hook = client
            .create_hook("acme", "widget", "https://ci.example.com/hook?webhook_token=t")
            .await
            .unwrap();

        assert_eq!(hook.id, 9);
    }

    #[tokio::test]
    async fn test_update_hook_patches_by_id() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/repos/acme/widget/hooks/7"))
            .and(body_partial_json(json!({ "config": { "url": "https://new" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "config": { "url": "https://new" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri());
        let hook = client.update_hook("acme", "widget", 7, "https://new").await.unwrap();

        assert_eq!(hook.url(), "https://new");
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/missing/hooks"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(server.uri());
        let err = client.list_hooks("acme", "missing", 1).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }
}
