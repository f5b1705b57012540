//! Releases published on a GitHub repository

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use tube_client::GitHubClient;
use tube_core::domain::resource::Source;
use tube_core::dto::resource::{OutRequest, OutResult, Version, VersionCatalog};

use crate::protocol::Resource;

#[derive(Debug, Deserialize)]
struct ReleaseSource {
    owner: String,
    repository: String,
    #[serde(default)]
    artifact_pattern: Option<String>,
    #[serde(default)]
    prereleases: bool,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Versions are release tags (without a leading `v`), located at the first
/// asset matching `artifact_pattern`
pub struct GitHubReleaseResource {
    api_url: String,
}

impl GitHubReleaseResource {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl Resource for GitHubReleaseResource {
    async fn versions(&self, source: &Source) -> Result<VersionCatalog> {
        let config: ReleaseSource = serde_json::from_value(Value::Object(source.clone()))
            .context("Invalid github-release source")?;

        let pattern = config
            .artifact_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("Invalid artifact_pattern")?;

        let mut client = GitHubClient::new(&self.api_url);
        if let Some(token) = &config.access_token {
            let username = config.username.as_deref().unwrap_or("x-access-token");
            client = client.with_credentials(username, token);
        }

        let mut catalog = VersionCatalog::new();
        let mut page = 1;
        loop {
            let releases = client
                .list_releases(&config.owner, &config.repository, page)
                .await
                .with_context(|| {
                    format!(
                        "Failed to list releases for {}/{}",
                        config.owner, config.repository
                    )
                })?;

            for release in releases.items {
                if release.draft || (release.prerelease && !config.prereleases) {
                    continue;
                }

                let asset = release
                    .assets
                    .iter()
                    .find(|a| pattern.as_ref().is_none_or(|p| p.is_match(&a.name)));

                match asset {
                    Some(asset) => {
                        let tag = release.tag_name.as_str();
                        let version = tag.strip_prefix('v').unwrap_or(tag);
                        catalog.insert(Version::new(version), asset.browser_download_url.clone());
                    }
                    None => debug!("release {} has no matching asset", release.tag_name),
                }
            }

            match releases.next_page {
                Some(next) if next > page => page = next,
                Some(next) => bail!(
                    "GitHub pagination for {}/{} did not advance past page {} (next was {})",
                    config.owner,
                    config.repository,
                    page,
                    next
                ),
                None => break,
            }
        }

        Ok(catalog)
    }

    async fn out(&self, _request: &OutRequest, _source_path: &Path) -> Result<OutResult> {
        bail!("github-release resources do not support out")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(value: Value) -> Source {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    async fn server_with_two_pages() -> MockServer {
        let server = MockServer::start().await;
        let next = format!(
            r#"<{}/repos/acme/widget/releases?per_page=100&page=2>; rel="next""#,
            server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/releases"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", next.as_str())
                    .set_body_json(json!([
                        { "id": 3, "tag_name": "v1.2.0", "assets": [
                            { "name": "widget-1.2.0.sha256", "browser_download_url": "https://dl/widget-1.2.0.sha256" },
                            { "name": "widget-1.2.0.tgz", "browser_download_url": "https://dl/widget-1.2.0.tgz" }
                        ]},
                        { "id": 2, "tag_name": "v1.2.0-rc.1", "prerelease": true, "assets": [
                            { "name": "widget-1.2.0-rc.1.tgz", "browser_download_url": "https://dl/widget-1.2.0-rc.1.tgz" }
                        ]},
                        { "id": 4, "tag_name": "v1.3.0", "draft": true, "assets": [
                            { "name": "widget-1.3.0.tgz", "browser_download_url": "https://dl/widget-1.3.0.tgz" }
                        ]}
                    ])),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/releases"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "tag_name": "1.1.0", "assets": [
                    { "name": "widget-1.1.0.tgz", "browser_download_url": "https://dl/widget-1.1.0.tgz" }
                ]},
                { "id": 0, "tag_name": "1.0.0", "assets": [] }
            ])))
            .mount(&server)
            .await;

        server
    }

    #[tokio::test]
    async fn test_versions_across_pages() {
        let server = server_with_two_pages().await;
        let resource = GitHubReleaseResource::new(server.uri());

        let catalog = resource
            .versions(&source(json!({
                "owner": "acme",
                "repository": "widget",
                "artifact_pattern": "\\.tgz$"
            })))
            .await
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog[&Version::new("1.2.0")],
            "https://dl/widget-1.2.0.tgz"
        );
        assert_eq!(
            catalog[&Version::new("1.1.0")],
            "https://dl/widget-1.1.0.tgz"
        );
    }

    #[tokio::test]
    async fn test_versions_include_prereleases_when_asked() {
        let server = server_with_two_pages().await;
        let resource = GitHubReleaseResource::new(server.uri());

        let catalog = resource
            .versions(&source(json!({
                "owner": "acme",
                "repository": "widget",
                "artifact_pattern": "\\.tgz$",
                "prereleases": true
            })))
            .await
            .unwrap();

        assert!(catalog.contains_key(&Version::new("1.2.0-rc.1")));
        assert!(!catalog.contains_key(&Version::new("1.3.0")));
    }

    #[tokio::test]
    async fn test_versions_invalid_source() {
        let resource = GitHubReleaseResource::new("http://127.0.0.1:1");
        let result = resource.versions(&source(json!({ "owner": "acme" }))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_versions_stalled_pagination_fails() {
        let server = MockServer::start().await;
        let same = format!(
            r#"<{}/repos/acme/widget/releases?per_page=100&page=1>; rel="next""#,
            server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/releases"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", same.as_str())
                    .set_body_json(json!([])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let resource = GitHubReleaseResource::new(server.uri());
        let err = resource
            .versions(&source(json!({ "owner": "acme", "repository": "widget" })))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("did not advance past page 1"));
    }

    #[tokio::test]
    async fn test_out_is_unsupported() {
        let resource = GitHubReleaseResource::new("http://127.0.0.1:1");
        let result = resource
            .out(&OutRequest::default(), Path::new("/tmp"))
            .await;
        assert!(result.is_err());
    }
}
