//! Pipeline command handlers
//!
//! Assembles the pipeline from the project descriptor, writes it out and,
//! for `transform`, brings the repository webhooks in line with it.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use tube_client::{DEFAULT_API_URL, GitHubClient};
use tube_core::assembler::assemble;
use tube_core::domain::pipeline::Pipeline;

use crate::config::{Config, WebhookConfig};
use crate::contributors::{contributors, known_resource_types};
use crate::descriptor::Descriptor;
use crate::repository::GitHubHookRepository;
use crate::service::{ReconcileSummary, WebhookReconciler, write_pipeline};

/// Flags needed to manage webhooks
#[derive(Args, Debug)]
pub struct WebhookArgs {
    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    github_api_url: String,

    /// GitHub user owning the access token
    #[arg(long, env = "GITHUB_USERNAME")]
    github_username: String,

    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Orchestrator URL the webhooks call back to
    #[arg(long, env = "CONCOURSE_URI")]
    concourse_uri: String,

    /// Orchestrator team owning the pipeline
    #[arg(long, env = "CONCOURSE_TEAM", default_value = "main")]
    concourse_team: String,
}

impl From<WebhookArgs> for WebhookConfig {
    fn from(args: WebhookArgs) -> Self {
        Self {
            github_api_url: args.github_api_url,
            github_username: args.github_username,
            github_access_token: args.github_token,
            concourse_uri: args.concourse_uri,
            concourse_team: args.concourse_team,
        }
    }
}

/// Reads the descriptor and assembles its pipeline
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let descriptor = Descriptor::from_path(&config.descriptor_path)?;
    let pipeline = assemble(
        descriptor.short_name(),
        &contributors(&descriptor, &config.webhook_salt),
        &known_resource_types(),
    )
    .with_context(|| format!("Failed to assemble pipeline {}", descriptor.short_name()))?;
    Ok(pipeline)
}

/// Handle `render`
pub fn render(config: &Config) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    write_pipeline(&pipeline, config.pipeline_path.as_deref())?;

    if let Some(path) = &config.pipeline_path {
        print_written(&pipeline, &path.display().to_string());
    }
    Ok(())
}

/// Handle `transform`
pub async fn transform(config: &Config, webhooks: WebhookConfig) -> Result<()> {
    webhooks.validate().context("Invalid webhook configuration")?;

    let pipeline = build_pipeline(config)?;
    write_pipeline(&pipeline, config.pipeline_path.as_deref())?;

    let client = GitHubClient::new(&webhooks.github_api_url)
        .with_credentials(&webhooks.github_username, &webhooks.github_access_token);
    let repository = GitHubHookRepository::new(client);
    let reconciler =
        WebhookReconciler::new(&repository, &webhooks.concourse_uri, &webhooks.concourse_team);

    let summary = reconciler.reconcile(&pipeline).await?;

    if let Some(path) = &config.pipeline_path {
        print_written(&pipeline, &path.display().to_string());
    }
    print_summary(&summary);
    Ok(())
}

fn print_written(pipeline: &Pipeline, destination: &str) {
    eprintln!(
        "{} Pipeline {} written to {}",
        "✓".green().bold(),
        pipeline.name.cyan(),
        destination
    );
    eprintln!(
        "  {}: {}  {}: {}  {}: {}",
        "Jobs".bold(),
        pipeline.jobs.len(),
        "Resources".bold(),
        pipeline.resources.len(),
        "Groups".bold(),
        pipeline.groups.len()
    );
}

fn print_summary(summary: &ReconcileSummary) {
    if summary.total() == 0 {
        eprintln!("{}", "No webhooks to reconcile".dimmed());
        return;
    }

    eprintln!("{} Webhooks reconciled", "✓".green().bold());
    eprintln!("  {}: {}", "Created".green(), summary.created);
    eprintln!("  {}: {}", "Updated".yellow(), summary.updated);
    eprintln!("  {}: {}", "Unchanged".dimmed(), summary.unchanged);
}
