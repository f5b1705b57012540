//! Concrete resource families
//!
//! Each family implements [`Resource`](crate::protocol::Resource) on its own;
//! they share no state.

mod github_release;
mod index;

pub use github_release::GitHubReleaseResource;
pub use index::IndexResource;

use clap::ValueEnum;
use reqwest::Client;

use crate::protocol::Resource;

/// Resource families this binary can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    /// Release assets of a GitHub repository
    GithubRelease,
    /// A JSON document mapping versions to download URIs
    Index,
}

impl ResourceKind {
    /// Builds the capability for this family
    pub fn build(self, github_api_url: &str, client: Client) -> Box<dyn Resource> {
        match self {
            ResourceKind::GithubRelease => Box::new(GitHubReleaseResource::new(github_api_url)),
            ResourceKind::Index => Box::new(IndexResource::new(client)),
        }
    }
}
