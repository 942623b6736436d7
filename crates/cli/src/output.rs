//! Plain-text rendering of command results.

use std::fmt::Write;

use adminhub_domain::{HealthStatus, WorkflowPage};
use adminhub_infra::config::ConfigReport;

const NAME_WIDTH: usize = 40;

/// Render a workflow page as an aligned table.
pub fn workflow_table(page: &WorkflowPage) -> String {
    if page.workflows.is_empty() {
        return "No workflows found.\n".to_string();
    }

    let id_width = page.workflows.iter().map(|w| w.id().len()).max().unwrap_or(2).max(2);
    let name_width = NAME_WIDTH;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<id_width$}  {:<name_width$}  {:<8}  {:>5}  {:>5}  UPDATED",
        "ID", "NAME", "STATUS", "NODES", "CONNS"
    );
    for workflow in &page.workflows {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<name_width$}  {:<8}  {:>5}  {:>5}  {}",
            workflow.id(),
            truncate(workflow.name(), NAME_WIDTH),
            if workflow.active() { "active" } else { "inactive" },
            workflow.node_count(),
            workflow.connection_count(),
            workflow.updated_at(),
        );
    }

    let _ = writeln!(out, "\n{} workflow(s)", page.workflows.len());
    if let Some(cursor) = &page.next_cursor {
        let _ = writeln!(out, "More results available: --cursor {cursor}");
    }
    out
}

/// Render a health probe result.
pub fn health_report(status: &HealthStatus) -> String {
    let mut out = String::new();
    let verdict = if status.is_healthy() { "healthy" } else { "UNHEALTHY" };

    let _ = writeln!(out, "Service:       {}", status.api_url);
    let _ = writeln!(out, "Status:        {verdict}");
    let _ = writeln!(out, "Response time: {:.3}s", status.response_time.as_secs_f64());
    if let Some(count) = status.workflow_count {
        let _ = writeln!(out, "Workflows:     {count} (probe page)");
    }
    if let Some(error) = &status.error {
        let _ = writeln!(out, "Error:         {error}");
    }
    let _ = writeln!(out, "Checked at:    {}", status.checked_at.to_rfc3339());
    out
}

/// Render a configuration report grouped by severity.
pub fn config_report(report: &ConfigReport) -> String {
    let mut out = String::new();

    for (title, lines) in [
        ("Errors", &report.errors),
        ("Warnings", &report.warnings),
        ("Info", &report.info),
        ("Fixed", &report.fixed),
    ] {
        if lines.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{title}:");
        for line in lines {
            let _ = writeln!(out, "  - {line}");
        }
    }

    let summary = if !report.is_valid() {
        "Configuration has errors."
    } else if report.is_clean() {
        "Configuration is valid."
    } else {
        "Configuration is valid with warnings."
    };
    let _ = writeln!(out, "{summary}");
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
