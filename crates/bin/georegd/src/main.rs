//! # georegd: georeg daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing` from the configured filter
//! - Assemble the service-type registry from the configured providers
//! - Initialise the `SQLite` connection pool and run migrations
//! - Construct repository and handler-factory implementations (adapters)
//! - Construct application services, injecting adapters via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use georeg_adapter_http_axum::state::AppState;
use georeg_adapter_ows_reqwest::OwsHandlerFactory;
use georeg_adapter_storage_sqlite_sqlx::{SqliteGeoAppRepository, SqliteServiceRepository};
use georeg_app::services::geoapp_service::GeoAppService;
use georeg_app::services::service_catalog::ServiceCatalog;
use georeg_domain::service_type::{ProviderTable, available_service_types};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Service types
    let service_types =
        available_service_types(&config.services.type_modules, &ProviderTable::builtin())?;
    tracing::info!(
        types = ?service_types.keys().map(ToString::to_string).collect::<Vec<_>>(),
        "service types loaded"
    );

    // Database
    let db = georeg_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Adapters
    let service_repo = SqliteServiceRepository::new(pool.clone());
    let geoapp_repo = SqliteGeoAppRepository::new(pool);
    let factory = OwsHandlerFactory::new(&georeg_adapter_ows_reqwest::Config {
        timeout: config.probe_timeout(),
    })?;

    // Services
    let service_catalog = ServiceCatalog::new(service_repo, factory, Arc::new(service_types));
    let geoapp_service = GeoAppService::new(geoapp_repo);

    // HTTP
    let state = AppState::new(service_catalog, geoapp_service);
    let app = georeg_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "georegd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("georegd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
