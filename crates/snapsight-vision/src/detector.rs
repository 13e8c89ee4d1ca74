use async_trait::async_trait;

use crate::types::{FaceDetail, Label};

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Label detection failed: {0}")]
    LabelDetectionFailed(String),

    #[error("Face detection failed: {0}")]
    FaceDetectionFailed(String),
}

/// Detection over an object identified by bucket and key.
#[async_trait]
pub trait Detector: Send + Sync {
    /// At most `max_labels` labels with confidence of at least `min_confidence` percent.
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
        min_confidence: f32,
    ) -> Result<Vec<Label>, VisionError>;

    /// Faces in the image. With `all_attributes` every facial attribute is requested,
    /// otherwise only the service's default subset.
    async fn detect_faces(
        &self,
        bucket: &str,
        key: &str,
        all_attributes: bool,
    ) -> Result<Vec<FaceDetail>, VisionError>;
}
