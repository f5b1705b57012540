//! Service Module
//!
//! What the CLI does with an assembled pipeline.

pub mod webhooks;
pub mod writer;

pub use webhooks::{ReconcileSummary, WebhookReconciler};
pub use writer::write_pipeline;
