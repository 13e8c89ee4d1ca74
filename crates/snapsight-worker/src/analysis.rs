//! Image analysis: label and face detection on a stored upload.
//!
//! The handler never fails. Each detection pass is independent; a failure in one is logged
//! and recorded in its [`PassOutcome`] while the other still runs to completion.

use std::sync::Arc;

use serde::Serialize;
use snapsight_core::{keys, AnalysisConfig, MessageError, QueueMessage};
use snapsight_storage::{ObjectStorage, StorageError};
use snapsight_vision::{Detector, VisionError};

use crate::queue::QueueRecord;

const RESULT_CONTENT_TYPE: &str = "application/json";

/// Result of one detection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Results were written to `key`; `items` is the number of labels or faces.
    Succeeded { key: String, items: usize },
    Failed { reason: String },
}

impl PassOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PassOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub uuid: String,
    pub labels: PassOutcome,
    pub faces: PassOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The batch had no records.
    Empty,
    /// The first record was not a usable message; nothing was analyzed.
    Rejected(MessageError),
    Analyzed(AnalysisReport),
}

#[derive(Debug, thiserror::Error)]
enum PassError {
    #[error(transparent)]
    Detection(#[from] VisionError),

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write result: {0}")]
    Storage(#[from] StorageError),
}

pub struct AnalysisHandler {
    config: AnalysisConfig,
    storage: Arc<dyn ObjectStorage>,
    detector: Arc<dyn Detector>,
}

impl AnalysisHandler {
    pub fn new(
        config: AnalysisConfig,
        storage: Arc<dyn ObjectStorage>,
        detector: Arc<dyn Detector>,
    ) -> Self {
        Self {
            config,
            storage,
            detector,
        }
    }

    /// Analyze the first record of a delivered batch. Any further records are ignored.
    pub async fn handle(&self, records: &[QueueRecord]) -> AnalysisOutcome {
        let Some((first, ignored)) = records.split_first() else {
            tracing::debug!("Empty batch, nothing to analyze");
            return AnalysisOutcome::Empty;
        };

        if !ignored.is_empty() {
            let ignored_ids: Vec<&str> = ignored.iter().map(|r| r.message_id.as_str()).collect();
            tracing::warn!(
                ignored_count = ignored.len(),
                ignored_message_ids = ?ignored_ids,
                "Only the first record of a batch is analyzed; ignoring the rest"
            );
        }

        let message = match QueueMessage::parse(&first.body) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    message_id = %first.message_id,
                    "Rejecting malformed analysis message"
                );
                return AnalysisOutcome::Rejected(e);
            }
        };

        AnalysisOutcome::Analyzed(self.analyze(&message).await)
    }

    #[tracing::instrument(
        skip(self, message),
        fields(uuid = %message.uuid(), key = %message.s3_file_path())
    )]
    async fn analyze(&self, message: &QueueMessage) -> AnalysisReport {
        tracing::info!("Starting image analysis");

        let (labels, faces) = tokio::join!(self.label_pass(message), self.face_pass(message));

        tracing::info!(
            labels_ok = labels.is_success(),
            faces_ok = faces.is_success(),
            "Image analysis finished"
        );

        AnalysisReport {
            uuid: message.uuid().to_string(),
            labels,
            faces,
        }
    }

    async fn label_pass(&self, message: &QueueMessage) -> PassOutcome {
        let key = keys::label_result_key(message.uuid());
        let result = async {
            let labels = self
                .detector
                .detect_labels(
                    &self.config.bucket_name,
                    message.s3_file_path(),
                    self.config.max_labels,
                    self.config.min_confidence,
                )
                .await?;
            self.write_result(&key, &labels).await?;
            Ok::<_, PassError>(labels.len())
        }
        .await;

        Self::outcome("label", key, result)
    }

    async fn face_pass(&self, message: &QueueMessage) -> PassOutcome {
        let key = keys::face_result_key(message.uuid());
        let result = async {
            let faces = self
                .detector
                .detect_faces(&self.config.bucket_name, message.s3_file_path(), true)
                .await?;
            self.write_result(&key, &faces).await?;
            Ok::<_, PassError>(faces.len())
        }
        .await;

        Self::outcome("face", key, result)
    }

    async fn write_result<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), PassError> {
        let body = serde_json::to_vec_pretty(items)?;
        self.storage
            .put_object(&self.config.bucket_name, key, body, RESULT_CONTENT_TYPE)
            .await?;
        Ok(())
    }

    fn outcome(pass: &'static str, key: String, result: Result<usize, PassError>) -> PassOutcome {
        match result {
            Ok(items) => {
                tracing::info!(pass, key = %key, items, "Detection pass succeeded");
                PassOutcome::Succeeded { key, items }
            }
            Err(e) => {
                tracing::warn!(pass, error = %e, "Detection pass failed");
                PassOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
