//! Application setup and initialization

pub mod clients;
pub mod routes;
pub mod server;

use crate::services::ingress::IngressHandler;
use crate::state::AppState;
use anyhow::{Context, Result};
use snapsight_core::Config;
use snapsight_worker::{AnalysisHandler, QueueConsumer};
use std::sync::Arc;

/// Everything `main` needs to run and later stop the service.
pub struct Application {
    pub router: axum::Router,
    /// Present when the analysis worker runs in-process.
    pub consumer: Option<QueueConsumer>,
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<Application> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.log_format)?;

    tracing::info!(
        environment = %config.environment,
        bucket = %config.bucket_name,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let clients = clients::setup_clients(&config).await?;

    let state = Arc::new(AppState::new(
        IngressHandler::new(
            config.ingress(),
            clients.storage.clone(),
            clients.queue.clone(),
        ),
        config.is_production(),
    ));

    let consumer = if config.worker_enabled {
        let handler = AnalysisHandler::new(config.analysis(), clients.storage, clients.detector);
        Some(QueueConsumer::start(
            clients.queue,
            Arc::new(handler),
            config.worker(),
        ))
    } else {
        tracing::info!("Analysis worker disabled (WORKER_ENABLED=false)");
        None
    };

    let router = routes::setup_routes(&config, state);

    Ok(Application {
        router,
        consumer,
    })
}
