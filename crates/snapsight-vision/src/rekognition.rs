//! AWS Rekognition detector

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types as sdk;
use aws_sdk_rekognition::Client as RekognitionClient;

use crate::detector::{Detector, VisionError};
use crate::types::{
    AgeRange, BoolAttribute, BoundingBox, Emotion, FaceDetail, Gender, ImageQuality, Instance,
    Label, Landmark, Parent, Pose,
};

/// Detector backed by Rekognition, reading images straight from S3.
#[derive(Clone)]
pub struct RekognitionDetector {
    client: RekognitionClient,
}

impl RekognitionDetector {
    /// Create a detector; `region` falls back to the SDK's default provider chain.
    pub async fn new(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;

        Self::from_client(RekognitionClient::new(&config))
    }

    pub fn from_client(client: RekognitionClient) -> Self {
        Self { client }
    }

    fn s3_image(bucket: &str, key: &str) -> sdk::Image {
        sdk::Image::builder()
            .s3_object(sdk::S3Object::builder().bucket(bucket).name(key).build())
            .build()
    }
}

#[async_trait]
impl Detector for RekognitionDetector {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
        min_confidence: f32,
    ) -> Result<Vec<Label>, VisionError> {
        let response = self
            .client
            .detect_labels()
            .image(Self::s3_image(bucket, key))
            .max_labels(max_labels)
            .min_confidence(min_confidence)
            .send()
            .await
            .map_err(|e| VisionError::LabelDetectionFailed(DisplayErrorContext(&e).to_string()))?;

        let labels: Vec<Label> = response.labels().iter().map(Label::from).collect();

        tracing::info!(
            bucket = %bucket,
            key = %key,
            labels_count = labels.len(),
            "Rekognition label detection completed"
        );

        Ok(labels)
    }

    async fn detect_faces(
        &self,
        bucket: &str,
        key: &str,
        all_attributes: bool,
    ) -> Result<Vec<FaceDetail>, VisionError> {
        let attribute = if all_attributes {
            sdk::Attribute::All
        } else {
            sdk::Attribute::Default
        };

        let response = self
            .client
            .detect_faces()
            .image(Self::s3_image(bucket, key))
            .attributes(attribute)
            .send()
            .await
            .map_err(|e| VisionError::FaceDetectionFailed(DisplayErrorContext(&e).to_string()))?;

        let faces: Vec<FaceDetail> = response.face_details().iter().map(FaceDetail::from).collect();

        tracing::info!(
            bucket = %bucket,
            key = %key,
            faces_count = faces.len(),
            "Rekognition face detection completed"
        );

        Ok(faces)
    }
}

// Every yes/no attribute type exposes the same `value()` / `confidence()` pair.
macro_rules! bool_attribute {
    ($attribute:expr) => {
        $attribute.map(|a| BoolAttribute {
            value: Some(a.value()),
            confidence: a.confidence(),
        })
    };
}

impl From<&sdk::BoundingBox> for BoundingBox {
    fn from(bbox: &sdk::BoundingBox) -> Self {
        Self {
            width: bbox.width(),
            height: bbox.height(),
            left: bbox.left(),
            top: bbox.top(),
        }
    }
}

impl From<&sdk::Label> for Label {
    fn from(label: &sdk::Label) -> Self {
        Self {
            name: label.name().map(String::from),
            confidence: label.confidence(),
            instances: label
                .instances()
                .iter()
                .map(|instance| Instance {
                    bounding_box: instance.bounding_box().map(BoundingBox::from),
                    confidence: instance.confidence(),
                })
                .collect(),
            parents: label
                .parents()
                .iter()
                .map(|parent| Parent {
                    name: parent.name().map(String::from),
                })
                .collect(),
        }
    }
}

impl From<&sdk::FaceDetail> for FaceDetail {
    fn from(face: &sdk::FaceDetail) -> Self {
        Self {
            bounding_box: face.bounding_box().map(BoundingBox::from),
            age_range: face.age_range().map(|range| AgeRange {
                low: range.low(),
                high: range.high(),
            }),
            smile: bool_attribute!(face.smile()),
            eyeglasses: bool_attribute!(face.eyeglasses()),
            sunglasses: bool_attribute!(face.sunglasses()),
            gender: face.gender().map(|gender| Gender {
                value: gender.value().map(|v| v.as_str().to_string()),
                confidence: gender.confidence(),
            }),
            beard: bool_attribute!(face.beard()),
            mustache: bool_attribute!(face.mustache()),
            eyes_open: bool_attribute!(face.eyes_open()),
            mouth_open: bool_attribute!(face.mouth_open()),
            emotions: face
                .emotions()
                .iter()
                .map(|emotion| Emotion {
                    kind: emotion.r#type().map(|t| t.as_str().to_string()),
                    confidence: emotion.confidence(),
                })
                .collect(),
            landmarks: face
                .landmarks()
                .iter()
                .map(|landmark| Landmark {
                    kind: landmark.r#type().map(|t| t.as_str().to_string()),
                    x: landmark.x(),
                    y: landmark.y(),
                })
                .collect(),
            pose: face.pose().map(|pose| Pose {
                roll: pose.roll(),
                yaw: pose.yaw(),
                pitch: pose.pitch(),
            }),
            quality: face.quality().map(|quality| ImageQuality {
                brightness: quality.brightness(),
                sharpness: quality.sharpness(),
            }),
            confidence: face.confidence(),
            face_occluded: bool_attribute!(face.face_occluded()),
        }
    }
}
