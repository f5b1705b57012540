//! Version filtering and ordering
//!
//! Versions are ordered by semantic-version precedence. Strings that do not
//! parse sort below every parseable version, in string order among
//! themselves, so ordering is total and never fails. Distinct spellings of
//! one precedence, like `1.0` and `1.0.0`, are kept and ordered by string.

use regex::Regex;
use std::cmp::Ordering;
use tube_core::dto::resource::{Version, VersionCatalog};

/// Parses a version leniently
///
/// Accepts a leading `v` and fills in missing minor and patch components,
/// so `v1.2` reads as `1.2.0`.
pub fn parse_semver(raw: &str) -> Option<semver::Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    if let Ok(version) = semver::Version::parse(trimmed) {
        return Some(version);
    }

    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, rest) = trimmed.split_at(split);

    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }

    semver::Version::parse(&format!("{}{}", parts.join("."), rest)).ok()
}

fn compare(a: &Version, b: &Version) -> Ordering {
    parse_semver(a.as_str())
        .cmp(&parse_semver(b.as_str()))
        .then_with(|| a.cmp(b))
}

/// Catalog versions that passed the filter, in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSet {
    versions: Vec<Version>,
}

impl VersionSet {
    /// Selects the catalog versions matching `pattern` and sorts them
    ///
    /// With no pattern every version is kept.
    pub fn from_catalog(catalog: &VersionCatalog, pattern: Option<&Regex>) -> Self {
        let mut versions: Vec<Version> = catalog
            .keys()
            .filter(|v| pattern.is_none_or(|p| p.is_match(v.as_str())))
            .cloned()
            .collect();

        versions.sort_by(compare);

        Self { versions }
    }

    /// The newest version, if any
    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Versions from the first one not less than `baseline`, inclusive
    ///
    /// Empty when every version is older than the baseline.
    pub fn since(&self, baseline: &semver::Version) -> Vec<Version> {
        let start = self
            .versions
            .iter()
            .position(|v| parse_semver(v.as_str()).is_some_and(|p| &p >= baseline));

        match start {
            Some(index) => self.versions[index..].to_vec(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }
}
