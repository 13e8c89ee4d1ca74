//! The queue message handed from ingress to analysis.

use serde::{Deserialize, Serialize};

use crate::image_file::ImageFile;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("message body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("message has no s3FilePath")]
    MissingFilePath,

    #[error("message has no uuid")]
    MissingUuid,
}

/// `{ "s3FilePath": "...", "uuid": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueMessage {
    #[serde(rename = "s3FilePath")]
    s3_file_path: String,
    uuid: String,
}

// Fields are optional on the wire so a missing field is reported as such rather than as a
// generic decode error.
#[derive(Deserialize)]
struct RawQueueMessage {
    #[serde(rename = "s3FilePath")]
    s3_file_path: Option<String>,
    uuid: Option<String>,
}

impl QueueMessage {
    /// Message announcing a freshly stored upload.
    pub fn for_upload(file: &ImageFile) -> Self {
        Self {
            s3_file_path: file.storage_key(),
            uuid: file.id().to_string(),
        }
    }

    /// Parses a received body. Both fields must be present and non-empty.
    pub fn parse(body: &str) -> Result<Self, MessageError> {
        let raw: RawQueueMessage =
            serde_json::from_str(body).map_err(|e| MessageError::InvalidJson(e.to_string()))?;

        let s3_file_path = raw
            .s3_file_path
            .filter(|path| !path.is_empty())
            .ok_or(MessageError::MissingFilePath)?;
        let uuid = raw
            .uuid
            .filter(|uuid| !uuid.is_empty())
            .ok_or(MessageError::MissingUuid)?;

        Ok(Self { s3_file_path, uuid })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn s3_file_path(&self) -> &str {
        &self.s3_file_path
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }
}
