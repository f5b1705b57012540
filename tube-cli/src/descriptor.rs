//! Project descriptor
//!
//! The YAML file a project checks in to describe the pipeline it wants:
//!
//! ```yaml
//! name: github.com/acme/widget
//! branch: main
//! package:
//!   repository: ghcr.io/acme/widget
//! dependencies:
//!   - name: jdk
//!     uses: github-release
//!     with:
//!       owner: adoptium
//!       repository: temurin17-binaries
//!       artifact_pattern: "OpenJDK17U-jdk_x64_linux_.*\\.tar\\.gz$"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tube_core::domain::resource::Source;

/// Parsed project descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    /// Repository path, e.g. `github.com/acme/widget`
    pub name: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Present when the project publishes a package
    #[serde(default)]
    pub package: Option<Package>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Package {
    pub repository: String,
}

/// An upstream artifact the project tracks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dependency {
    pub name: String,

    /// Resource type serving the dependency
    pub uses: String,

    /// Source configuration passed to the resource
    #[serde(default)]
    pub with: Source,
}

impl Dependency {
    /// Name of the pipeline resource tracking this dependency
    pub fn resource_name(&self) -> String {
        format!("dependency-{}", self.name)
    }
}

fn default_branch() -> String {
    "main".to_string()
}

impl Descriptor {
    /// Reads and validates a descriptor file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid descriptor {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let descriptor: Descriptor =
            serde_yaml::from_str(content).context("Failed to parse descriptor YAML")?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    fn validate(&self) -> Result<()> {
        let segments: Vec<&str> = self.name.split('/').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.trim().is_empty()) {
            anyhow::bail!(
                "name must look like <host>/<owner>/<repository>, got {:?}",
                self.name
            );
        }

        let mut seen = HashSet::new();
        for dependency in &self.dependencies {
            if dependency.name.trim().is_empty() {
                anyhow::bail!("dependency names cannot be empty");
            }
            if !seen.insert(dependency.name.as_str()) {
                anyhow::bail!("dependency {:?} is declared more than once", dependency.name);
            }
        }

        Ok(())
    }

    fn segment(&self, index: usize) -> &str {
        self.name.split('/').nth(index).unwrap_or_default()
    }

    /// Repository owner on the source-control host
    pub fn owner(&self) -> &str {
        self.segment(1)
    }

    /// Repository name on the source-control host
    pub fn repository(&self) -> &str {
        self.segment(2)
    }

    /// Name the pipeline is registered under
    pub fn short_name(&self) -> &str {
        self.repository()
    }
}
