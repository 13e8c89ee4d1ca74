//! SQS-backed [`MessageQueue`].

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::config::Builder as SqsConfigBuilder;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::Client;

use crate::queue::{MessageQueue, QueueError, QueueRecord};

#[derive(Clone)]
pub struct SqsQueue {
    client: Client,
}

impl SqsQueue {
    /// Create a new SqsQueue
    ///
    /// # Arguments
    /// * `region` - AWS region; falls back to the SDK's default provider chain when `None`
    /// * `endpoint_url` - Optional custom endpoint for SQS-compatible services (e.g. LocalStack)
    pub async fn new(region: Option<String>, endpoint_url: Option<String>) -> Self {
        let region_provider = RegionProviderChain::first_try(region.map(aws_config::Region::new))
            .or_default_provider();

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        let mut sqs_config_builder = SqsConfigBuilder::from(&config);
        if let Some(ref endpoint) = endpoint_url {
            sqs_config_builder = sqs_config_builder.endpoint_url(endpoint);
        }

        Self::from_client(Client::from_conf(sqs_config_builder.build()))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn publish(&self, queue_url: &str, body: &str) -> Result<(), QueueError> {
        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                let error = DisplayErrorContext(&e).to_string();
                tracing::error!(error = %error, queue_url = %queue_url, "SQS publish failed");
                QueueError::PublishFailed(error)
            })?;

        tracing::info!(
            queue_url = %queue_url,
            message_id = output.message_id().unwrap_or_default(),
            "SQS publish successful"
        );

        Ok(())
    }

    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> Result<Vec<QueueRecord>, QueueError> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_time_seconds)
            .send()
            .await
            .map_err(|e| QueueError::ReceiveFailed(DisplayErrorContext(&e).to_string()))?;

        let records: Vec<QueueRecord> = output
            .messages()
            .iter()
            .map(|message| QueueRecord {
                message_id: message.message_id().unwrap_or_default().to_string(),
                body: message.body().unwrap_or_default().to_string(),
                receipt_handle: message.receipt_handle().map(String::from),
            })
            .collect();

        if !records.is_empty() {
            tracing::debug!(
                queue_url = %queue_url,
                count = records.len(),
                "Received messages from SQS"
            );
        }

        Ok(records)
    }

    async fn acknowledge(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::AcknowledgeFailed(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
