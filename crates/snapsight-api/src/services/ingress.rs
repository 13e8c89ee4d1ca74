//! Ingress: validate an upload, store it, and queue it for analysis.

use std::sync::Arc;

use serde::Deserialize;
use snapsight_core::{
    AppError, ImageFile, ImageFileBody, ImageFileName, IngressConfig, QueueMessage, UserInvalid,
};
use snapsight_storage::ObjectStorage;
use snapsight_worker::MessageQueue;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest {
    file_name: Option<String>,
    image_base64: Option<String>,
}

/// What was stored and announced for an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub id: String,
    pub key: String,
}

pub struct IngressHandler {
    config: IngressConfig,
    storage: Arc<dyn ObjectStorage>,
    queue: Arc<dyn MessageQueue>,
}

impl IngressHandler {
    pub fn new(
        config: IngressConfig,
        storage: Arc<dyn ObjectStorage>,
        queue: Arc<dyn MessageQueue>,
    ) -> Self {
        Self {
            config,
            storage,
            queue,
        }
    }

    /// Handle a raw request body.
    ///
    /// The object is written before the message is published. A publish failure leaves the
    /// object in place.
    #[tracing::instrument(skip(self, body), fields(body_bytes = body.len()))]
    pub async fn accept(&self, body: &[u8]) -> Result<Accepted, AppError> {
        if body.is_empty() {
            return Err(
                UserInvalid::bad_request("invalid parameters", "リクエストが不正です").into(),
            );
        }

        let request: UploadRequest = serde_json::from_slice(body)?;
        let file_name = ImageFileName::new(request.file_name.unwrap_or_default())?;
        let file_body = ImageFileBody::new(request.image_base64.as_deref().unwrap_or_default())?;
        let file = ImageFile::new(file_name, file_body);

        let key = file.storage_key();
        self.storage
            .put_object(
                &self.config.bucket_name,
                &key,
                file.body().to_vec(),
                file.content_type(),
            )
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(
            id = %file.id(),
            key = %key,
            content_type = %file.content_type(),
            size_bytes = file.body().len(),
            "Stored upload"
        );

        let message = QueueMessage::for_upload(&file).to_json()?;
        self.queue
            .publish(&self.config.queue_url, &message)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(id = %file.id(), "Queued upload for analysis");

        Ok(Accepted {
            id: file.id().to_string(),
            key,
        })
    }
}
