//! Resource and resource type domain types

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::webhook::WebHook;

/// Free-form `source` configuration handed to a resource implementation
pub type Source = Map<String, Value>;

/// An external dependency declaration consumable by jobs
///
/// Identity is the name: two resources with the same name are the same
/// resource within one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub source: Source,
    /// Serialized as the `webhook_token` the orchestrator checks on callbacks
    #[serde(
        rename = "webhook_token",
        serialize_with = "serialize_webhook_token",
        skip_serializing_if = "has_no_token"
    )]
    pub webhook: WebHook,
}

impl Resource {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            icon: None,
            source: Source::new(),
            webhook: WebHook::default(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_source(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.source.insert(key.into(), value.into());
        self
    }

    pub fn with_webhook(mut self, webhook: WebHook) -> Self {
        self.webhook = webhook;
        self
    }

    /// Whether this resource asks for a webhook on its source repository
    pub fn has_webhook(&self) -> bool {
        !self.webhook.is_empty()
    }
}

fn has_no_token(webhook: &WebHook) -> bool {
    webhook.token.is_empty()
}

fn serialize_webhook_token<S: Serializer>(webhook: &WebHook, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&webhook.token)
}

/// A reusable resource implementation the orchestrator pulls as an image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceType {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub source: Source,
}

impl ResourceType {
    /// A resource type backed by a container image in a registry
    pub fn registry_image(name: impl Into<String>, repository: impl Into<String>) -> Self {
        let mut source = Source::new();
        source.insert("repository".to_string(), Value::String(repository.into()));

        Self {
            name: name.into(),
            kind: "registry-image".to_string(),
            source,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.source.insert("tag".to_string(), Value::String(tag.into()));
        self
    }
}
