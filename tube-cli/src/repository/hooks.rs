//! Webhook Repository
//!
//! Reads and writes the webhooks registered on a source repository.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tube_client::{ClientError, GitHubClient, Hook, Page};

/// Webhooks registered on repositories of the source-control host
#[async_trait]
pub trait HookRepository: Send + Sync {
    /// One page of hooks, 1-based
    async fn list_hooks(&self, owner: &str, repository: &str, page: u32) -> Result<Page<Hook>>;

    async fn create_hook(&self, owner: &str, repository: &str, url: &str) -> Result<Hook>;

    async fn update_hook(&self, owner: &str, repository: &str, id: u64, url: &str)
    -> Result<Hook>;
}

/// GitHub answers 404 for repositories the token cannot administer
fn explain(error: ClientError, owner: &str, repository: &str) -> anyhow::Error {
    if error.is_not_found() || error.is_unauthorized() {
        anyhow::Error::new(error).context(format!(
            "{}/{} does not exist or the token lacks admin:repo_hook",
            owner, repository
        ))
    } else {
        error.into()
    }
}

/// [`HookRepository`] backed by the GitHub REST API
pub struct GitHubHookRepository {
    client: GitHubClient,
}

impl GitHubHookRepository {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HookRepository for GitHubHookRepository {
    async fn list_hooks(&self, owner: &str, repository: &str, page: u32) -> Result<Page<Hook>> {
        self.client
            .list_hooks(owner, repository, page)
            .await
            .map_err(|e| explain(e, owner, repository))
            .with_context(|| format!("Failed to list hooks of {}/{}", owner, repository))
    }

    async fn create_hook(&self, owner: &str, repository: &str, url: &str) -> Result<Hook> {
        self.client
            .create_hook(owner, repository, url)
            .await
            .map_err(|e| explain(e, owner, repository))
            .with_context(|| format!("Failed to create hook on {}/{}", owner, repository))
    }

    async fn update_hook(
        &self,
        owner: &str,
        repository: &str,
        id: u64,
        url: &str,
    ) -> Result<Hook> {
        self.client
            .update_hook(owner, repository, id, url)
            .await
            .map_err(|e| explain(e, owner, repository))
            .with_context(|| format!("Failed to update hook {} on {}/{}", id, owner, repository))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_hidden_repository_is_explained() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/secret/hooks"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let repository = GitHubHookRepository::new(GitHubClient::new(server.uri()));
        let err = repository.list_hooks("acme", "secret", 1).await.unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("Failed to list hooks of acme/secret"));
        assert!(message.contains("admin:repo_hook"));
    }

    #[tokio::test]
    async fn test_server_error_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/widget/hooks"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let repository = GitHubHookRepository::new(GitHubClient::new(server.uri()));
        let err = repository
            .create_hook("acme", "widget", "https://ci.example.com/hook")
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("502"));
        assert!(!message.contains("admin:repo_hook"));
    }
}
