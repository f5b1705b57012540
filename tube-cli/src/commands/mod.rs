//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod pipeline;

pub use pipeline::WebhookArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Assemble the pipeline and write it out
    Render,
    /// Write the pipeline, then reconcile repository webhooks
    Transform {
        #[command(flatten)]
        webhooks: WebhookArgs,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Render => pipeline::render(config),
        Commands::Transform { webhooks } => pipeline::transform(config, webhooks.into()).await,
    }
}
