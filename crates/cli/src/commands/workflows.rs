use std::path::{Path, PathBuf};
use std::process::ExitCode;

use adminhub_domain::AppConfig;
use adminhub_infra::ListQuery;
use anyhow::{Context, Result};

use super::{build_client, emit, emit_json};
use crate::{output, WorkflowCommands};

impl WorkflowCommands {
    pub async fn run(self, config: &AppConfig) -> Result<ExitCode> {
        let client = build_client(config)?;
        let scope = client.session()?;

        match self {
            WorkflowCommands::List { active, limit, cursor, json } => {
                let mut query = ListQuery::default().with_limit(limit).active_only(active);
                query.cursor = cursor;

                let page = scope.list_workflows_page(&query).await?;
                if json {
                    emit_json(&page)?;
                } else {
                    emit(&output::workflow_table(&page))?;
                }
            }
            WorkflowCommands::Get { id } => {
                let workflow = scope.get_workflow(&id).await?;
                emit_json(&workflow)?;
            }
            WorkflowCommands::Export { id, include_credentials, output: output_path } => {
                let bundle = match id.as_deref() {
                    Some(id) => scope.export_workflow(id, include_credentials).await?,
                    None => scope.export_default_workflow(include_credentials).await?,
                };

                let workflow_id = match id {
                    Some(id) => id,
                    None => scope.default_workflow_id().unwrap_or("workflow").to_string(),
                };
                let path = output_path
                    .unwrap_or_else(|| export_path(&config.backup_directory, &workflow_id));
                write_bundle(&path, &bundle)?;

                tracing::info!(path = %path.display(), "wrote export bundle");
                emit(&format!(
                    "Exported '{}' to {}{}",
                    bundle.workflow_name().unwrap_or(&workflow_id),
                    path.display(),
                    if include_credentials { " (credentials included)" } else { "" }
                ))?;
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

/// Default export location for `workflow_id` under `backup_dir`.
///
/// Characters outside `[A-Za-z0-9_-]` are replaced so the id is always a
/// single safe file name.
pub fn export_path(backup_dir: &Path, workflow_id: &str) -> PathBuf {
    let file_stem: String = workflow_id
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    backup_dir.join(format!("{file_stem}.json"))
}

fn write_bundle(path: &Path, bundle: &adminhub_domain::ExportBundle) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let rendered = serde_json::to_string_pretty(bundle).context("failed to serialize export")?;
    std::fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))
}
