//! Repository Module
//!
//! Access to state held outside the pipeline document.

pub mod hooks;

pub use hooks::{GitHubHookRepository, HookRepository};
