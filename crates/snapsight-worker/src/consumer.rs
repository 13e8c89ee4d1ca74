//! Queue consumer: long-polls the analysis queue and feeds each batch to the
//! [`AnalysisHandler`].
//!
//! Every received record is acknowledged after the handler returns, whatever the outcome: the
//! handler has already logged anything that went wrong, and a redelivery would not change it.
//!
//! Shutdown: [`QueueConsumer::shutdown`] signals the loop and waits for it to finish the batch
//! in flight.

use std::sync::Arc;
use std::time::Duration;

use snapsight_core::WorkerConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::analysis::AnalysisHandler;
use crate::queue::{MessageQueue, QueueError, QueueRecord};

pub struct QueueConsumer {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl QueueConsumer {
    /// Spawn the polling loop on the current tokio runtime.
    pub fn start(
        queue: Arc<dyn MessageQueue>,
        handler: Arc<AnalysisHandler>,
        config: WorkerConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            Self::run(queue, handler, config, shutdown_rx).await;
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Receive one batch, analyze it and acknowledge it. Returns the number of records
    /// received.
    pub async fn poll_once(
        queue: &dyn MessageQueue,
        handler: &AnalysisHandler,
        config: &WorkerConfig,
    ) -> Result<usize, QueueError> {
        let records = queue
            .receive(
                &config.queue_url,
                config.max_messages,
                config.wait_time_seconds,
            )
            .await?;

        Self::process_batch(queue, handler, &config.queue_url, &records).await;
        Ok(records.len())
    }

    async fn process_batch(
        queue: &dyn MessageQueue,
        handler: &AnalysisHandler,
        queue_url: &str,
        records: &[QueueRecord],
    ) {
        if records.is_empty() {
            return;
        }

        handler.handle(records).await;
        Self::acknowledge_all(queue, queue_url, records).await;
    }

    async fn acknowledge_all(queue: &dyn MessageQueue, queue_url: &str, records: &[QueueRecord]) {
        for record in records {
            let Some(receipt_handle) = record.receipt_handle.as_deref() else {
                tracing::warn!(
                    message_id = %record.message_id,
                    "Record has no receipt handle, cannot acknowledge"
                );
                continue;
            };

            if let Err(e) = queue.acknowledge(queue_url, receipt_handle).await {
                tracing::warn!(
                    error = %e,
                    message_id = %record.message_id,
                    "Failed to acknowledge record; it will be redelivered"
                );
            }
        }
    }

    async fn run(
        queue: Arc<dyn MessageQueue>,
        handler: Arc<AnalysisHandler>,
        config: WorkerConfig,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(
            queue_url = %config.queue_url,
            max_messages = config.max_messages,
            wait_time_seconds = config.wait_time_seconds,
            "Queue consumer started"
        );

        let error_delay = Duration::from_millis(config.error_delay_ms);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Queue consumer shutting down");
                    break;
                }
                result = queue.receive(
                    &config.queue_url,
                    config.max_messages,
                    config.wait_time_seconds,
                ) => match result {
                    Ok(records) => {
                        Self::process_batch(queue.as_ref(), &handler, &config.queue_url, &records)
                            .await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Queue receive failed");
                        tokio::select! {
                            _ = shutdown_rx.recv() => break,
                            _ = sleep(error_delay) => {}
                        }
                    }
                }
            }
        }

        tracing::info!("Queue consumer stopped");
    }

    /// Stop polling and wait for the loop to exit.
    pub async fn shutdown(self) {
        tracing::info!("Initiating queue consumer shutdown");
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Queue consumer task panicked");
        }
    }
}
