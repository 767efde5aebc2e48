//! # Service Extraction Server Main Driver
//!
//! ## Purpose
//! Main entry point for the extraction server. Loads configuration, compiles
//! the pattern catalog, and starts the web server that handles extraction
//! requests from the conversational front end.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files, command line arguments, environment variables
//! - **Output**: Running web server with extraction API endpoints
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Compile the extraction pattern catalog
//! 4. Start web API server
//! 5. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use service_extract::{
    api::ApiServer,
    config::Config,
    errors::{ExtractorError, Result},
    extractor::Extractor,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("service-extract-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("ServiceFinder Team")
        .about("Deterministic service-request extraction engine for a local-services marketplace")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Validate configuration and pattern catalog, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").expect("has default");
    let mut config = Config::from_file(config_path)?;

    // Override port if specified
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    // Initialize logging
    init_logging(&config)?;

    info!("Starting service extraction engine v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    // Run health checks if requested
    if matches.get_flag("check-health") {
        return run_health_checks(&config);
    }

    // Compile the extraction pipeline
    let extractor = Arc::new(Extractor::new(config.extraction.clone())?);
    info!("Pattern catalog compiled successfully");

    let app_state = AppState {
        config: config.clone(),
        extractor,
        started_at: std::time::Instant::now(),
    };

    // Start the API server. The run future is awaited here rather than
    // spawned: the App factory holds non-Send internals, so only the bound
    // server future may cross threads.
    let server = ApiServer::new(app_state);

    info!(
        "Service extraction engine started on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        result = server.run() => {
            match result {
                Ok(()) => warn!("Server stopped unexpectedly"),
                Err(e) => error!("Server error: {}", e),
            }
        }
    }

    info!("Service extraction engine shut down successfully");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let filter =
        EnvFilter::try_new(&config.logging.level).map_err(|_| ExtractorError::Config {
            message: format!("Invalid log level: {}", config.logging.level),
        })?;

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Validate configuration and the pattern catalog without serving
fn run_health_checks(config: &Config) -> Result<()> {
    info!("Running health checks...");

    config.validate()?;
    info!("✓ Configuration is valid");

    Extractor::new(config.extraction.clone())?;
    info!("✓ Pattern catalog compiles");

    info!("All health checks passed!");
    Ok(())
}
