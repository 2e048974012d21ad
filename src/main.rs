//! ctile - A read-through tile cache for CT logs.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ctile::{
    config::Config,
    create_s3_client,
    server::{create_router, RouterConfig},
    HttpLogBackend, S3ObjectStore, TileCache, TileService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("ctile v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Log URL: {}", config.log_url());
    info!("  Tile size: {}", config.tile_size);
    info!("  S3 bucket: {}", config.s3_bucket);
    info!("  S3 prefix: {}", config.s3_prefix());
    if let Some(ref endpoint) = config.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  S3 region: {}", config.s3_region);
    info!(
        "  Full request timeout: {:?}",
        config.full_request_timeout()
    );

    // Create S3 client and check the bucket is reachable
    let s3_client = create_s3_client(config.s3_endpoint.as_deref(), &config.s3_region).await;
    let store = S3ObjectStore::new(s3_client, config.s3_bucket.clone());

    info!("Connecting to S3...");
    if let Err(e) = store.check_bucket().await {
        error!("  Failed to connect to S3: {}", e);
        error!("  Please check:");
        error!("    - Your AWS credentials are configured correctly");
        error!(
            "    - The bucket '{}' exists and is accessible",
            config.s3_bucket
        );
        error!("    - The S3 endpoint is correct (if using MinIO/custom S3)");
        return ExitCode::FAILURE;
    }
    info!("  Connected successfully");

    // Create backend client
    let backend = match HttpLogBackend::with_connect_timeout(config.backend_connect_timeout()) {
        Ok(backend) => backend,
        Err(e) => {
            error!("Failed to build backend HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Create tile service
    let cache = TileCache::new(store, config.s3_prefix());
    let tile_service = TileService::new(backend, cache, config.log_url(), config.tile_size);

    // Create router
    let router_config = RouterConfig::new()
        .with_request_timeout(config.full_request_timeout())
        .with_tracing(!config.no_tracing);
    let router = create_router(tile_service, router_config);

    // Bind and serve
    let addr = &config.listen_address;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!(
        "  curl 'http://{}/ct/v1/get-entries?start=0&end=0'",
        addr
    );

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Resolve when Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "ctile=debug,tower_http=debug"
    } else {
        "ctile=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
