//! Webhook Service
//!
//! Makes the hooks registered on each source repository match the webhook
//! intent of the pipeline's resources. A hook is identified by the callback
//! URL without its token, so a rotated token updates the hook in place.

use anyhow::{Context, Result};
use tracing::{debug, info};
use tube_client::Hook;
use tube_core::domain::pipeline::Pipeline;
use tube_core::domain::resource::Resource;

use crate::repository::HookRepository;

/// What a reconciliation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ReconcileSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged
    }
}

/// Reconciles repository webhooks against an assembled pipeline
pub struct WebhookReconciler<'a> {
    hooks: &'a dyn HookRepository,
    concourse_uri: String,
    team: String,
}

impl<'a> WebhookReconciler<'a> {
    pub fn new(
        hooks: &'a dyn HookRepository,
        concourse_uri: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        Self {
            hooks,
            concourse_uri: concourse_uri.into().trim_end_matches('/').to_string(),
            team: team.into(),
        }
    }

    /// Check endpoint the orchestrator exposes for `resource`, without token
    pub fn callback_url(&self, pipeline: &str, resource: &str) -> String {
        format!(
            "{}/api/v1/teams/{}/pipelines/{}/resources/{}/check/webhook",
            self.concourse_uri, self.team, pipeline, resource
        )
    }

    /// Ensures one hook per resource with webhook intent
    ///
    /// Resources are processed by repository then resource name. The first
    /// failing call aborts the run.
    pub async fn reconcile(&self, pipeline: &Pipeline) -> Result<ReconcileSummary> {
        let mut resources: Vec<&Resource> =
            pipeline.resources.iter().filter(|r| r.has_webhook()).collect();
        resources.sort_by(|a, b| {
            (a.webhook.slug(), &a.name).cmp(&(b.webhook.slug(), &b.name))
        });

        let mut summary = ReconcileSummary::default();
        for resource in resources {
            self.reconcile_resource(&pipeline.name, resource, &mut summary)
                .await
                .with_context(|| format!("Failed to reconcile webhook of {}", resource.name))?;
        }

        info!(
            "Webhooks reconciled: {} created, {} updated, {} unchanged",
            summary.created, summary.updated, summary.unchanged
        );
        Ok(summary)
    }

    async fn reconcile_resource(
        &self,
        pipeline: &str,
        resource: &Resource,
        summary: &mut ReconcileSummary,
    ) -> Result<()> {
        let webhook = &resource.webhook;
        let callback = self.callback_url(pipeline, &resource.name);
        let url = format!("{}?webhook_token={}", callback, webhook.token);

        let existing = self
            .find_hook(&webhook.owner, &webhook.repository, &callback)
            .await?;

        match existing {
            None => {
                info!("Creating webhook on {} for {}", webhook.slug(), resource.name);
                self.hooks
                    .create_hook(&webhook.owner, &webhook.repository, &url)
                    .await?;
                summary.created += 1;
            }
            Some(hook) if hook.url() != url => {
                info!(
                    "Updating webhook {} on {} for {}",
                    hook.id,
                    webhook.slug(),
                    resource.name
                );
                self.hooks
                    .update_hook(&webhook.owner, &webhook.repository, hook.id, &url)
                    .await?;
                summary.updated += 1;
            }
            Some(hook) => {
                debug!("Webhook {} on {} is up to date", hook.id, webhook.slug());
                summary.unchanged += 1;
            }
        }

        Ok(())
    }

    /// First hook, across all pages, whose URL starts with `callback`
    async fn find_hook(&self, owner: &str, repository: &str, callback: &str) -> Result<Option<Hook>> {
        let mut page = 1;
        loop {
            let listed = self.hooks.list_hooks(owner, repository, page).await?;
            debug!("{}/{} page {}: {} hooks", owner, repository, page, listed.items.len());

            if let Some(hook) = listed.items.into_iter().find(|h| h.url().starts_with(callback)) {
                return Ok(Some(hook));
            }

            match listed.next_page {
                Some(next) if next > page => page = next,
                Some(next) => anyhow::bail!(
                    "hook pagination for {}/{} did not advance past page {} (next was {})",
                    owner,
                    repository,
                    page,
                    next
                ),
                None => return Ok(None),
            }
        }
    }
}
