//! CLI command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::observability::{init_tracing, log_event, log_event_with_fields, Event};
use crate::rest_api::BookstoreServer;
use crate::store::{EntityStore, InMemoryStore};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Init { config, force } => init(&config, force),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Loads the configuration and applies command-line overrides
pub fn load_config(path: Option<&Path>, port: Option<u16>) -> CliResult<AppConfig> {
    let mut config = AppConfig::load_or_default(path)?;
    if let Some(port) = port {
        config.server.port = port;
        config.validate()?;
    }
    Ok(config)
}

/// Start the HTTP server and block until Ctrl-C
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let config = load_config(config_path, port)?;
    init_tracing(&config.logging)?;

    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("source", source.as_str()), ("policy", config.auth.policy.as_str())],
    );
    if config.auth.policy.uses_credentials() && config.auth.uses_placeholder_secret() {
        tracing::warn!("auth.jwt_secret is the placeholder value; set a real secret");
    }

    let store: Arc<dyn EntityStore> = Arc::new(InMemoryStore::new());
    let server = BookstoreServer::new(&config, store);
    log_event_with_fields(Event::ServerStarting, &[("addr", server.socket_addr())]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        log_event(Event::Serving);
        server.start_with_shutdown(shutdown_signal()).await
    })
    .map_err(|e| {
        log_event_with_fields(Event::ServerFailed, &[("error", e.to_string().as_str())]);
        CliError::serve_failed(format!("HTTP server failed: {}", e))
    })?;

    log_event(Event::ShutdownComplete);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    log_event(Event::ShutdownStart);
}

/// Write a default configuration file
pub fn init(config_path: &Path, force: bool) -> CliResult<()> {
    if config_path.exists() && !force {
        return Err(CliError::already_exists(config_path));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = AppConfig::default().to_json_pretty()?;
    fs::write(config_path, content + "\n")?;

    log_event_with_fields(
        Event::ConfigWritten,
        &[("path", config_path.display().to_string().as_str())],
    );
    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}

/// Effective configuration as pretty JSON
pub fn effective_config(config_path: &Path) -> CliResult<String> {
    let config = AppConfig::load(config_path)?;
    Ok(config.to_json_pretty()?)
}

/// Validate a configuration file and print it with defaults filled in
pub fn check_config(config_path: &Path) -> CliResult<()> {
    println!("{}", effective_config(config_path)?);
    Ok(())
}
