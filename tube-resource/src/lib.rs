//! Tube Resource
//!
//! Runtime for the orchestrator's resource protocol. A resource is invoked
//! as three short-lived processes:
//!
//! - `check`: discover versions newer than the last one seen
//! - `in`: fetch one version into a directory
//! - `out`: publish a new version from a directory
//!
//! Concrete families only describe where versions live; filtering,
//! ordering, windowing and artifact retrieval are shared.

pub mod artifact;
pub mod error;
pub mod protocol;
pub mod resources;
pub mod version_set;

pub use artifact::{ArtifactFetcher, HttpArtifactFetcher};
pub use error::{ProtocolError, Result};
pub use protocol::{Operation, Resource, ResourceRuntime};
pub use resources::ResourceKind;
pub use version_set::VersionSet;
