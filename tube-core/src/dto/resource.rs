//! Resource protocol DTOs
//!
//! Wire types exchanged with the orchestrator over stdin/stdout when it runs
//! a resource's `check`, `in` and `out` scripts.
//!
//! - A version is always `{"ref": "<string>"}`.
//! - Metadata is always a list of `{"name", "value"}` pairs sorted by name,
//!   never a map, so output is byte-for-byte stable.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::resource::Source;

/// Opaque version identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(String);

#[derive(Serialize, Deserialize)]
struct VersionRef {
    #[serde(rename = "ref")]
    reference: String,
}

impl Version {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version::new(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Version(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VersionRef {
            reference: self.0.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        VersionRef::deserialize(deserializer).map(|r| Version(r.reference))
    }
}

/// Version to download location, as reported by a resource's upstream
pub type VersionCatalog = BTreeMap<Version, String>;

/// Name/value metadata shown by the orchestrator next to a version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<String, String>);

#[derive(Serialize, Deserialize)]
struct MetadataEntry {
    name: String,
    value: String,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|(name, value)| MetadataEntry {
            name: name.clone(),
            value: value.clone(),
        }))
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<MetadataEntry>::deserialize(deserializer)?;
        Ok(Metadata(
            entries.into_iter().map(|e| (e.name, e.value)).collect(),
        ))
    }
}

/// Request read by `check`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub version: Option<Version>,
}

impl CheckRequest {
    /// The baseline version, treating an empty ref as no baseline
    pub fn baseline(&self) -> Option<&Version> {
        self.version.as_ref().filter(|v| !v.is_empty())
    }
}

/// Result written by `check`: versions in ascending order
pub type CheckResult = Vec<Version>;

/// Request read by `in`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InRequest {
    #[serde(default)]
    pub source: Source,
    pub version: Version,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Result written by `in`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InResult {
    pub version: Version,
    pub metadata: Metadata,
}

/// Request read by `out`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutRequest {
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Result written by `out`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutResult {
    pub version: Version,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
}
