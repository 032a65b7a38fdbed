//! Command-line front end
//!
//! Flags arrive as a `--key=value` map; the first recognized command wins.

pub mod output;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use openapi_client::models::ResourceType;
use tokio::sync::watch;
use tracing::debug;

use crate::app::state::AppState;
use crate::errors::CoolifyError;
use crate::favorites::FavoriteResource;
use crate::session::{OnboardingStep, StartupStatus, TeamSelection};
use crate::utils::split_target;
use crate::workers::{deployment_watch, poller};

/// Lines fetched by `--logs` without `--lines`
pub const DEFAULT_LOG_LINES: u32 = 100;

pub const USAGE: &str = "\
Usage: coolkit [--key=value]...

  --setup --server=<url> [--token=<token>]   configure the instance
  --reset                                    forget the instance
  --status                                   check the configured instance
  --team=<id>                                select a team
  --list=<type>                              list resources
  --get=<type>:<id> [--follow]               show one resource
  --start|--stop|--restart=<type>:<uuid>     run an action
  --favorite=<type>:<uuid>                   toggle a favorite
  --favorites                                list favorites
  --deployments=<app uuid> [--skip=N]        deployment history
  --watch=<deployment uuid>                  follow a deployment
  --logs=<app uuid> [--lines=N] [--follow]   application logs
  --version                                  print version

Types: application, database, service, project, server, team";

type Shutdown = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Run the command selected by `args`
pub async fn run(
    state: &AppState,
    args: &HashMap<String, String>,
    shutdown: Shutdown,
) -> Result<(), CoolifyError> {
    if args.contains_key("setup") {
        return setup(state, args).await;
    }
    if args.contains_key("reset") {
        state.session.reset_setup().await?;
        output::success("Setup reset");
        return Ok(());
    }
    if args.contains_key("status") {
        return status(state).await;
    }
    if let Some(team) = args.get("team") {
        return select_team(state, team).await;
    }
    if let Some(kind) = args.get("list") {
        return list(state, kind.parse().map_err(CoolifyError::Validation)?).await;
    }
    if let Some(target) = args.get("get") {
        if args.contains_key("follow") {
            return follow_status(state, target, shutdown).await;
        }
        return get(state, target).await;
    }
    for action in ["start", "stop", "restart"] {
        if let Some(target) = args.get(action) {
            return run_action(state, action, target).await;
        }
    }
    if let Some(target) = args.get("favorite") {
        return toggle_favorite(state, target).await;
    }
    if args.contains_key("favorites") {
        return favorites(state).await;
    }
    if let Some(app) = args.get("deployments") {
        let skip = parse_number(args, "skip", 0)?;
        return deployments(state, app, skip).await;
    }
    if let Some(uuid) = args.get("watch") {
        return watch(state, uuid, shutdown).await;
    }
    if let Some(app) = args.get("logs") {
        let lines = parse_number(args, "lines", DEFAULT_LOG_LINES)?;
        if args.contains_key("follow") {
            return follow_logs(state, app, lines, shutdown).await;
        }
        return logs(state, app, lines).await;
    }

    println!("{}", USAGE);
    Ok(())
}

fn parse_number(args: &HashMap<String, String>, key: &str, default: u32) -> Result<u32, CoolifyError> {
    match args.get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| CoolifyError::Validation(format!("--{} expects a number, got {:?}", key, raw))),
        None => Ok(default),
    }
}

fn parse_target(target: &str) -> Result<(ResourceType, String), CoolifyError> {
    let (kind, id) = split_target(target).ok_or_else(|| {
        CoolifyError::Validation(format!("Expected <type>:<id>, got {:?}", target))
    })?;
    let resource_type = kind.parse().map_err(CoolifyError::Validation)?;
    Ok((resource_type, id.to_string()))
}

async fn setup(state: &AppState, args: &HashMap<String, String>) -> Result<(), CoolifyError> {
    let server = args
        .get("server")
        .ok_or_else(|| CoolifyError::Validation("--setup requires --server=<url>".to_string()))?;

    let address = state.session.set_server_address(server).await?;
    output::success(&format!("Connected to {}", address));

    if let Some(token) = args.get("token") {
        state.session.set_api_token(token).await?;
        output::success("API token saved");
        state.session.acknowledge_permissions().await?;
    }

    let teams = if state.session.has_api_token().await {
        state.queries.teams().await?
    } else {
        Vec::new()
    };
    report_onboarding(state, state.session.onboarding_step(&teams).await).await
}

async fn report_onboarding(state: &AppState, step: OnboardingStep) -> Result<(), CoolifyError> {
    match step {
        OnboardingStep::ConfigureServer => println!("Next: coolkit --setup --server=<url>"),
        OnboardingStep::ConfigureToken | OnboardingStep::AcknowledgePermissions => {
            println!("Next: coolkit --setup --server=<url> --token=<token>")
        }
        OnboardingStep::NoTeams => {
            output::failure("This token cannot see any team");
        }
        OnboardingStep::SelectTeam => println!("Next: coolkit --team=<id> (see --list=team)"),
        OnboardingStep::Ready => {
            state.session.set_setup_complete(true).await?;
            output::success("Setup complete");
        }
    }
    Ok(())
}

async fn status(state: &AppState) -> Result<(), CoolifyError> {
    let address = state.session.server_address().await.unwrap_or_default();
    match state.session.startup_check().await {
        StartupStatus::NotConfigured => {
            output::failure("Not configured");
            println!("Run: coolkit --setup --server=<url> --token=<token>");
        }
        StartupStatus::Unreachable => {
            output::failure(&format!("Server unreachable at {}", address));
        }
        StartupStatus::Ready => {
            output::success(&format!("Connected to {}", address));
            match state.session.selected_team().await {
                TeamSelection::Team(id) => println!("Team: {}", id),
                TeamSelection::NotSelected => println!("Team: none selected"),
            }
        }
    }
    Ok(())
}

async fn select_team(state: &AppState, team: &str) -> Result<(), CoolifyError> {
    let teams = state.queries.teams().await?;
    let Some(found) = teams.iter().find(|t| t.id.to_string() == team.trim()) else {
        return Err(CoolifyError::NotFound(format!("team {}", team)));
    };
    state.session.select_team(&found.id.to_string()).await?;
    output::success(&format!("Selected team {}", found.name));
    report_onboarding(state, state.session.onboarding_step(&teams).await).await
}

async fn list(state: &AppState, resource_type: ResourceType) -> Result<(), CoolifyError> {
    let resources = state.queries.resources(resource_type).await?;
    if resources.is_empty() {
        println!("No {} found", resource_type.collection());
        return Ok(());
    }
    for resource in &resources {
        let favorite = state
            .favorites
            .is_favorite(&FavoriteResource::new(resource.id(), resource_type));
        println!("{}", output::resource_row(resource, favorite));
    }
    Ok(())
}

async fn get(state: &AppState, target: &str) -> Result<(), CoolifyError> {
    let (resource_type, id) = parse_target(target)?;
    let resource = state.queries.resource(&id, resource_type).await?;
    let favorite = state
        .favorites
        .is_favorite(&FavoriteResource::new(id, resource_type));
    for line in output::resource_details(&resource, favorite) {
        println!("{}", line);
    }
    Ok(())
}

/// Print the resource status whenever it changes, at the status refetch interval
async fn follow_status(state: &AppState, target: &str, shutdown: Shutdown) -> Result<(), CoolifyError> {
    let (resource_type, id) = parse_target(target)?;
    let resource = state.queries.resource(&id, resource_type).await?;
    if resource.status().is_none() {
        return Err(CoolifyError::UnsupportedOperation(format!(
            "follow status of {}",
            resource_type
        )));
    }
    let (_focus_tx, focus) = watch::channel(true);
    let shown = Arc::new(Mutex::new(None::<String>));

    let refetch = || {
        let queries = state.queries.clone();
        let shown = shown.clone();
        let id = id.clone();
        async move {
            let resource = queries.refetch_resource(&id, resource_type).await?;
            let current = resource.status().map(str::to_string);
            let mut shown = shown.lock().unwrap_or_else(|e| e.into_inner());
            if *shown != current {
                if let Some(status) = &current {
                    println!("{} {}", resource.name(), output::status(status));
                }
                *shown = current;
            }
            Ok::<_, CoolifyError>(())
        }
    };

    poller::run(&state.options.poller, refetch, focus, tokio::time::sleep, shutdown).await;
    Ok(())
}

async fn run_action(state: &AppState, action: &str, target: &str) -> Result<(), CoolifyError> {
    let (resource_type, uuid) = parse_target(target)?;
    let response = match action {
        "start" => state.queries.start_resource(&uuid, resource_type).await?,
        "stop" => state.queries.stop_resource(&uuid, resource_type).await?,
        _ => state.queries.restart_resource(&uuid, resource_type).await?,
    };
    debug!("{} {} {}: {:?}", action, resource_type, uuid, response);

    output::success(response.message.as_deref().unwrap_or("Request sent"));
    if let Some(deployment_uuid) = response.deployment_uuid {
        println!("Deployment {} (follow with --watch={})", deployment_uuid, deployment_uuid);
    }
    Ok(())
}

async fn toggle_favorite(state: &AppState, target: &str) -> Result<(), CoolifyError> {
    let (resource_type, uuid) = parse_target(target)?;
    let change = state
        .favorites
        .toggle_favorite(FavoriteResource::new(uuid, resource_type))
        .await?;
    output::success(&change.message());
    Ok(())
}

async fn favorites(state: &AppState) -> Result<(), CoolifyError> {
    let favorites = state.favorites.load().await?;
    if favorites.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }

    let targets: Vec<(ResourceType, String)> = favorites
        .iter()
        .map(|f| (f.resource_type, f.uuid.clone()))
        .collect();
    let resolved = state.queries.resources_by_id(&targets).await;
    for (favorite, resource) in favorites.iter().zip(resolved) {
        match resource {
            Ok(resource) => println!("{}", output::resource_row(&resource, true)),
            Err(e) => {
                debug!("Favorite {} not resolved: {}", favorite.uuid, e);
                println!("{}", output::favorite_row(favorite));
            }
        }
    }
    Ok(())
}

async fn deployments(state: &AppState, application_uuid: &str, skip: u32) -> Result<(), CoolifyError> {
    let take = state.options.deployments_page_size;
    let page = state
        .queries
        .application_deployments(application_uuid, skip, take)
        .await?;

    if page.deployments.is_empty() {
        println!("No deployments");
    }
    for deployment in &page.deployments {
        println!("{}", output::deployment_row(deployment));
    }
    if let Some(next) = page.next_skip {
        println!("More: coolkit --deployments={} --skip={}", application_uuid, next);
    }
    Ok(())
}

async fn watch(state: &AppState, uuid: &str, shutdown: Shutdown) -> Result<(), CoolifyError> {
    let finished = deployment_watch::run(
        &state.queries,
        uuid,
        &state.options.deployment_watch,
        tokio::time::sleep,
        shutdown,
    )
    .await?;

    let Some(deployment) = finished else {
        return Ok(());
    };
    for line in deployment.visible_log_lines()? {
        println!("{}", output::log_line(&line));
    }
    println!(
        "Deployment {} {}",
        deployment.deployment_uuid,
        output::deployment_status(&deployment.status)
    );
    Ok(())
}

async fn logs(state: &AppState, application_uuid: &str, lines: u32) -> Result<(), CoolifyError> {
    let logs = state.queries.application_logs(application_uuid, lines).await?;
    print!("{}", logs);
    if !logs.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Reprint logs at the preferred refetch interval until interrupted
async fn follow_logs(
    state: &AppState,
    application_uuid: &str,
    lines: u32,
    shutdown: Shutdown,
) -> Result<(), CoolifyError> {
    let options = poller::Options {
        interval: state.preferences.logs_refetch_interval().await?,
        ..Default::default()
    };
    let (_focus_tx, focus) = watch::channel(true);
    let printed = Arc::new(Mutex::new(String::new()));

    let refetch = || {
        let queries = state.queries.clone();
        let printed = printed.clone();
        let application_uuid = application_uuid.to_string();
        async move {
            let logs = queries.application_logs(&application_uuid, lines).await?;
            let mut printed = printed.lock().unwrap_or_else(|e| e.into_inner());
            print!("{}", new_log_output(&printed, &logs));
            *printed = logs;
            Ok::<_, CoolifyError>(())
        }
    };

    poller::run(&options, refetch, focus, tokio::time::sleep, shutdown).await;
    Ok(())
}

/// The part of `current` not already shown; everything when the window moved
fn new_log_output<'a>(printed: &str, current: &'a str) -> &'a str {
    current.strip_prefix(printed).unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        let (ty, id) = parse_target("databases:d1").unwrap();
        assert_eq!(ty, ResourceType::Database);
        assert_eq!(id, "d1");

        assert!(parse_target("d1").is_err());
        assert!(parse_target("widget:d1").is_err());
    }

    #[test]
    fn test_new_log_output() {
        assert_eq!(new_log_output("", "a\nb\n"), "a\nb\n");
        assert_eq!(new_log_output("a\n", "a\nb\n"), "b\n");
        assert_eq!(new_log_output("a\nb\n", "b\nc\n"), "b\nc\n");
    }

    #[test]
    fn test_parse_number() {
        let mut args = HashMap::new();
        assert_eq!(parse_number(&args, "lines", 100).unwrap(), 100);
        args.insert("lines".to_string(), "25".to_string());
        assert_eq!(parse_number(&args, "lines", 100).unwrap(), 25);
        args.insert("lines".to_string(), "many".to_string());
        assert!(parse_number(&args, "lines", 100).is_err());
    }
}
