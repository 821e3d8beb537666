use std::fmt::Write as _;

use openclaw_config::DeploymentConfig;
use openclaw_docker::HealthStatus;
use openclaw_operations::operations::{CleanupSummary, DeployOutput, StatusReport};
use openclaw_operations::{RollbackStatus, Workflow};
use openclaw_rollback::RollbackOutcome;

fn yes_no(value: bool) -> &'static str {
    if value { "✓ Yes" } else { "✗ No" }
}

pub(crate) fn render_deploy_summary(output: &DeployOutput) -> String {
    let config = &output.config;
    let mut out = String::new();
    let _ = writeln!(out, "✓ Deployment completed successfully!");
    let _ = writeln!(out);
    let _ = writeln!(out, "Web UI:  {}", config.gateway_url());
    if let Some(token) = &config.gateway_token {
        let _ = writeln!(out, "Token:   {token}");
    }
    if let Some(url) = config.gateway_url_with_token() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Full URL:");
        let _ = writeln!(out, "  {url}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Useful commands:");
    let _ = writeln!(out, "  openclaw-deploy status      # Check deployment status");
    let _ = writeln!(out, "  openclaw-deploy logs -f     # Follow gateway logs");
    let _ = writeln!(out, "  openclaw-deploy cleanup     # Remove deployment");
    out
}

pub(crate) fn render_update_summary(config: &DeploymentConfig) -> String {
    format!(
        "✓ Update completed successfully!\n\nWeb UI: {}\n",
        config.gateway_url()
    )
}

fn render_health(health: Option<&HealthStatus>) -> String {
    match health {
        Some(HealthStatus::Healthy) => "✓ HEALTHY".to_string(),
        Some(HealthStatus::Unhealthy) => "✗ UNHEALTHY".to_string(),
        Some(other) => other.to_string(),
        None => "N/A".to_string(),
    }
}

pub(crate) fn render_status(
    report: &StatusReport,
    config: &DeploymentConfig,
    verbose: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Container Name:    {}", report.container_name);
    let _ = writeln!(out, "Container Exists:  {}", yes_no(report.exists));

    if report.exists {
        let status = report
            .status
            .as_ref()
            .map_or_else(|| "unknown".to_string(), ToString::to_string);
        let _ = writeln!(out, "Container Running: {}", yes_no(report.running));
        let _ = writeln!(out, "Container Status:  {status}");
        let _ = writeln!(
            out,
            "Health Check:      {}",
            render_health(report.health.as_ref())
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Gateway URL:       {}", report.gateway_url);
        if let Some(url) = &report.gateway_url_with_token {
            let _ = writeln!(out, "Access URL:        {url}");
        }

        if verbose {
            let _ = writeln!(out);
            out.push_str(&render_config_summary(config));
        }
    } else {
        let _ = writeln!(
            out,
            "Container does not exist. Run 'openclaw-deploy deploy' to create it."
        );
    }

    let _ = writeln!(out);
    if report.is_healthy() {
        let _ = writeln!(out, "Status: ✓ HEALTHY");
    } else {
        let _ = writeln!(out, "Status: ⚠ NOT HEALTHY");
    }
    out
}

/// Configuration overview. API keys are reported as present or absent only.
fn render_config_summary(config: &DeploymentConfig) -> String {
    let set = |value: &Option<String>| yes_no(value.as_deref().is_some_and(|v| !v.is_empty()));
    let mut out = String::new();
    let _ = writeln!(out, "Configuration:");
    let _ = writeln!(out, "  Project Dir:     {}", config.project_dir.display());
    let _ = writeln!(out, "  OpenClaw Home:   {}", config.openclaw_home.display());
    let _ = writeln!(out, "  Workspace:       {}", config.workspace_dir.display());
    let _ = writeln!(out, "  Image:           {}", config.image_name);
    let _ = writeln!(out, "  Gateway Port:    {}", config.gateway_port);
    let _ = writeln!(out, "  Gateway Bind:    {}", config.gateway_bind);
    let _ = writeln!(out);
    let _ = writeln!(out, "API Keys Configured:");
    let _ = writeln!(out, "  Anthropic:       {}", set(&config.anthropic_api_key));
    let _ = writeln!(out, "  OpenAI:          {}", set(&config.openai_api_key));
    let _ = writeln!(out, "  Google AI:       {}", set(&config.google_ai_api_key));
    let _ = writeln!(out, "  Ollama URL:      {}", set(&config.ollama_base_url));
    out
}

pub(crate) fn render_cleanup_summary(summary: &CleanupSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "✓ Cleanup completed successfully");
    if !summary.leftover_dirs.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Host directories still exist. To remove them, run:");
        for dir in &summary.leftover_dirs {
            let _ = writeln!(out, "  rm -rf {}", dir.display());
        }
    }
    out
}

/// What happened to the partial state of a failed deploy or update.
pub(crate) fn render_rollback(workflow: Workflow, status: &RollbackStatus) -> String {
    let mut out = String::new();
    match status.outcome {
        RollbackOutcome::Disabled => {
            let _ = writeln!(
                out,
                "Rollback is disabled; partial {workflow} state was left in place."
            );
            let _ = writeln!(out, "Clean up manually with:");
            let _ = writeln!(out, "  openclaw-deploy cleanup");
            let _ = writeln!(out, "or:");
            let _ = writeln!(out, "  docker compose down");
            return out;
        }
        RollbackOutcome::NothingToRollBack => {
            let _ = writeln!(out, "Nothing to roll back.");
            return out;
        }
        _ => {}
    }

    let _ = writeln!(out, "Rollback:");
    for action in &status.actions {
        match &action.error {
            None => {
                let _ = writeln!(out, "  ✓ {}", action.description);
            }
            Some(error) => {
                let _ = writeln!(out, "  ✗ {}: {error}", action.description);
            }
        }
    }
    if status.succeeded() {
        let _ = writeln!(out, "Rollback completed successfully.");
    } else {
        let _ = writeln!(
            out,
            "Rollback completed with errors; run 'openclaw-deploy cleanup' to remove what is left."
        );
    }
    out
}
