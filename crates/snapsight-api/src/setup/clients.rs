//! External service clients

use anyhow::{Context, Result};
use snapsight_core::Config;
use snapsight_storage::{create_storage, ObjectStorage};
use snapsight_vision::{Detector, RekognitionDetector};
use snapsight_worker::{MessageQueue, SqsQueue};
use std::sync::Arc;

pub struct Clients {
    pub storage: Arc<dyn ObjectStorage>,
    pub queue: Arc<dyn MessageQueue>,
    pub detector: Arc<dyn Detector>,
}

pub async fn setup_clients(config: &Config) -> Result<Clients> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(backend = %storage.backend_type(), "Storage backend ready");

    let queue = SqsQueue::new(config.aws_region.clone(), config.sqs_endpoint.clone()).await;
    let detector = RekognitionDetector::new(config.aws_region.clone()).await;

    Ok(Clients {
        storage,
        queue: Arc::new(queue),
        detector: Arc::new(detector),
    })
}
