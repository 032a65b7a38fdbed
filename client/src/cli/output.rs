//! Terminal rendering

use colored::{ColoredString, Colorize};
use openapi_client::models::{Deployment, DeploymentLogLine, DeploymentStatus, ResourceStatus};

use crate::favorites::FavoriteResource;
use crate::queries::Resource;
use crate::utils::truncate;

pub fn status(raw: &str) -> ColoredString {
    let parsed = ResourceStatus::parse(raw);
    if parsed.is_running() && parsed.health != Some("unhealthy") {
        raw.green()
    } else if parsed.lifecycle.starts_with("exited") || parsed.lifecycle.starts_with("stopped") {
        raw.red()
    } else {
        raw.yellow()
    }
}

pub fn deployment_status(status: &DeploymentStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        DeploymentStatus::Finished => label.green(),
        DeploymentStatus::Failed => label.red(),
        DeploymentStatus::InProgress => label.cyan(),
        _ => label.yellow(),
    }
}

pub fn resource_row(resource: &Resource, favorite: bool) -> String {
    let star = if favorite { "★".yellow().to_string() } else { " ".to_string() };
    let status = resource
        .status()
        .map(|s| status(s).to_string())
        .unwrap_or_default();
    format!(
        "{} {:<38} {:<32} {}",
        star,
        resource.id().dimmed(),
        truncate(resource.name(), 32),
        status
    )
}

pub fn resource_details(resource: &Resource, favorite: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}{}",
        resource.resource_type().as_str().bold(),
        resource.name().bold(),
        if favorite { " ★".yellow().to_string() } else { String::new() }
    )];
    lines.push(format!("  id:          {}", resource.id()));
    if let Some(description) = resource.description().filter(|d| !d.is_empty()) {
        lines.push(format!("  description: {}", description));
    }
    if let Some(s) = resource.status() {
        lines.push(format!("  status:      {}", status(s)));
    }
    if let Resource::Application(app) = resource {
        if let Some(fqdn) = &app.fqdn {
            lines.push(format!("  url:         {}", fqdn));
        }
        if let Some(repo) = &app.git_repository {
            let branch = app.git_branch.as_deref().unwrap_or("-");
            lines.push(format!("  git:         {} ({})", repo, branch));
        }
    }
    lines
}

pub fn favorite_row(favorite: &FavoriteResource) -> String {
    format!("★ {:<12} {}", favorite.resource_type.as_str(), favorite.uuid)
}

pub fn deployment_row(deployment: &Deployment) -> String {
    let commit = deployment
        .commit
        .as_deref()
        .map(|c| c.chars().take(7).collect::<String>())
        .unwrap_or_else(|| "-".to_string());
    let message = deployment
        .commit_message
        .as_deref()
        .and_then(|m| m.lines().next())
        .map(|m| truncate(m, 48))
        .unwrap_or_default();
    format!(
        "{:<38} {:<20} {:<8} {:<22} {}",
        deployment.deployment_uuid.dimmed(),
        deployment_status(&deployment.status),
        commit,
        deployment.created_at.as_deref().unwrap_or("-"),
        message
    )
}

pub fn log_line(line: &DeploymentLogLine) -> String {
    let ts = line
        .timestamp()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();
    let output = if line.is_stderr() {
        line.output.red().to_string()
    } else {
        line.output.clone()
    };
    format!("{} {}", ts.dimmed(), output)
}

pub fn success(message: &str) {
    println!("{} {}", "✔".green(), message);
}

pub fn failure(message: &str) {
    eprintln!("{} {}", "✘".red(), message);
}
