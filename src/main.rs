//! Collection Store Server
//!
//! Serves the collection API over HTTP, optionally alongside a static site.

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use collection_store::core::{config::Config, create_app_state, logging};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = Command::new("collection-store")
        .version(collection_store::VERSION)
        .about("Single-file JSON document store with a REST collection API.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .help("HTTP server bind address")
        )
        .arg(
            Arg::new("data-file")
                .long("data-file")
                .value_name("FILE")
                .help("JSON document holding all collections")
        )
        .arg(
            Arg::new("static-dir")
                .long("static-dir")
                .value_name("DIR")
                .help("Directory served for non-API routes")
        )
        .arg(
            Arg::new("write-mode")
                .long("write-mode")
                .value_name("MODE")
                .help("Mutation coordination (serialized, unguarded)")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let mut config = Config::load(config_path).context("Failed to load configuration")?;

    // Apply CLI overrides
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    // Initialize logging
    logging::init(&config.logging)?;

    info!("Starting {} v{}", collection_store::NAME, collection_store::VERSION);
    if let Some(path) = config_path {
        info!("Loaded configuration from: {}", path);
    }

    // Validate system requirements
    validate_system_requirements(&config)?;

    // Initialization failure is fatal: nothing can be served without a document
    let app_state = create_app_state(config)
        .await
        .context("Store initialization failed")?;

    collection_store::api::start_server(app_state, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config.server.http_addr = addr
            .parse()
            .with_context(|| format!("Invalid HTTP address: {}", addr))?;
    }

    if let Some(data_file) = matches.get_one::<String>("data-file") {
        config.storage.data_file = data_file.into();
    }

    if let Some(dir) = matches.get_one::<String>("static-dir") {
        config.set_static_dir(dir);
    }

    if let Some(mode) = matches.get_one::<String>("write-mode") {
        config.storage.write_mode = mode.parse()?;
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    Ok(())
}

/// Validate system requirements and configuration
fn validate_system_requirements(config: &Config) -> anyhow::Result<()> {
    // The document file is created by the store; its directory is created here
    if let Some(data_dir) = config.storage.data_file.parent() {
        if !data_dir.as_os_str().is_empty() && !data_dir.exists() {
            std::fs::create_dir_all(data_dir)
                .with_context(|| format!("Cannot create data directory {:?}", data_dir))?;
            info!("Created data directory: {:?}", data_dir);
        }
    }

    if let Some(static_files) = &config.static_files {
        if !static_files.dir.is_dir() {
            warn!("Static directory {:?} does not exist; non-API routes will 404", static_files.dir);
        }
    }

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C signal, shutting down");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down");
        },
    }
}
