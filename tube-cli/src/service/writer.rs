//! Pipeline Writer
//!
//! Serializes an assembled pipeline to the YAML document the orchestrator
//! loads.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;
use tube_core::domain::pipeline::Pipeline;

/// Validates the pipeline and renders it as YAML
pub fn render(pipeline: &Pipeline) -> Result<String> {
    pipeline
        .validate()
        .with_context(|| format!("Pipeline {} is inconsistent", pipeline.name))?;
    serde_yaml::to_string(pipeline).context("Failed to serialize pipeline")
}

/// Writes the rendered pipeline to `path`, or to stdout when unset
pub fn write_pipeline(pipeline: &Pipeline, path: Option<&Path>) -> Result<()> {
    let document = render(pipeline)?;

    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, document)
                .with_context(|| format!("Failed to write pipeline to {}", path.display()))?;
            info!("Pipeline {} written to {}", pipeline.name, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .context("Failed to write pipeline to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
