//! Tube CLI
//!
//! Turns a project descriptor into an orchestrator pipeline and keeps the
//! webhooks of its source repositories pointing at that pipeline.

mod commands;
mod config;
mod contributors;
mod descriptor;
mod repository;
mod service;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tube")]
#[command(about = "Tube pipeline builder", long_about = None)]
struct Cli {
    /// Project descriptor
    #[arg(long, env = "TUBE_DESCRIPTOR", default_value = "tube.yml")]
    descriptor: PathBuf,

    /// Pipeline output file; stdout when unset
    #[arg(long, env = "TUBE_PIPELINE")]
    pipeline: Option<PathBuf>,

    /// Salt mixed into generated webhook tokens
    #[arg(long, env = "TUBE_WEBHOOK_SALT", default_value = "", hide_env_values = true)]
    webhook_salt: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so a pipeline written to stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tube=info,tube_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        descriptor_path: cli.descriptor,
        pipeline_path: cli.pipeline,
        webhook_salt: cli.webhook_salt,
    };

    handle_command(cli.command, &config).await
}
