use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Acknowledge failed: {0}")]
    AcknowledgeFailed(String),
}

/// A message as delivered by the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    pub message_id: String,
    pub body: String,
    /// Needed to acknowledge the delivery; `None` when the queue did not hand one out.
    pub receipt_handle: Option<String>,
}

#[async_trait]
pub trait MessageQueue: Send + Sync {
    async fn publish(&self, queue_url: &str, body: &str) -> Result<(), QueueError>;

    /// Up to `max_messages` records, waiting at most `wait_time_seconds` for the first one.
    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> Result<Vec<QueueRecord>, QueueError>;

    /// Remove a delivered message so it is not redelivered.
    async fn acknowledge(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError>;
}
