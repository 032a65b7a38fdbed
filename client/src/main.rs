//! coolkit - Entry Point
//!
//! Manage a self-hosted Coolify instance from the terminal.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use coolkit::app::options::AppOptions;
use coolkit::app::state::AppState;
use coolkit::cli;
use coolkit::logs::{init_logging, LogLevel, LogOptions};
use coolkit::storage::layout::StorageLayout;
use coolkit::storage::settings::Settings;
use coolkit::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", version.version),
        }
        return ExitCode::SUCCESS;
    }

    let layout = match cli_args.get("home") {
        Some(dir) => StorageLayout::new(dir),
        None => StorageLayout::default(),
    };

    let settings = match Settings::load(&layout.settings_file()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = match cli_args.get("log-level") {
        Some(raw) => raw.parse::<LogLevel>().unwrap_or(settings.log_level.clone()),
        None => settings.log_level.clone(),
    };
    let log_options = LogOptions {
        log_level,
        json_format: settings.log_json,
        log_dir: Some(settings.resolved_log_dir(&layout)),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let options = AppOptions::from_settings(layout, &settings);
    info!("Running coolkit {} with options: {:?}", version.version, options);

    let state = match AppState::init(options).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize: {e}");
            cli::output::failure(&e.user_message());
            return ExitCode::FAILURE;
        }
    };

    match cli::run(&state, &cli_args, Box::pin(await_shutdown_signal())).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {e}");
            cli::output::failure(&e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Unable to listen for SIGTERM: {e}");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl+C received, shutting down...");
    }
}
