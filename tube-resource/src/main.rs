//! Tube Resource binary
//!
//! Entry point the orchestrator runs inside a resource container. The
//! request arrives on stdin, the response goes to stdout, and all logging
//! goes to stderr so it never corrupts the response.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use tube_client::DEFAULT_API_URL;
use tube_resource::{HttpArtifactFetcher, Operation, ResourceKind, ResourceRuntime};

#[derive(Parser)]
#[command(name = "tube-resource")]
#[command(about = "Check, fetch and publish versions of an artifact resource", long_about = None)]
struct Cli {
    /// Resource family to serve
    #[arg(long, env = "TUBE_RESOURCE_KIND", value_enum)]
    kind: ResourceKind,

    /// GitHub API URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    github_api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover versions
    Check,
    /// Fetch a version into a directory
    In {
        /// Directory to fetch into
        destination: PathBuf,
    },
    /// Publish a version from a directory
    Out {
        /// Directory holding the build's inputs
        source: PathBuf,
    },
}

impl From<Command> for Operation {
    fn from(command: Command) -> Self {
        match command {
            Command::Check => Operation::Check,
            Command::In { destination } => Operation::In { destination },
            Command::Out { source } => Operation::Out { source },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tube_resource=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        kind: cli.kind,
        github_api_url: cli.github_api_url,
    };
    config.validate()?;

    let operation = Operation::from(cli.command);
    info!("Running {:?} for {:?}", operation, config.kind);

    let client = Client::new();
    let runtime = ResourceRuntime::new(
        config.kind.build(&config.github_api_url, client.clone()),
        Box::new(HttpArtifactFetcher::new(client)),
    );

    runtime
        .run(&operation, std::io::stdin().lock(), std::io::stdout().lock())
        .await
        .context("Resource operation failed")?;

    Ok(())
}
