//! Snapsight Vision Library
//!
//! Label and face detection against images already sitting in object storage. The
//! [`Detector`] trait is the seam; [`RekognitionDetector`] is the production implementation.
//! Result types serialize with the PascalCase field names Rekognition itself uses, so the
//! stored JSON looks like the service response.

pub mod detector;
#[cfg(feature = "rekognition")]
pub mod rekognition;
pub mod types;

pub use detector::{Detector, VisionError};
#[cfg(feature = "rekognition")]
pub use rekognition::RekognitionDetector;
pub use types::{
    AgeRange, BoolAttribute, BoundingBox, Emotion, FaceDetail, Gender, ImageQuality, Instance,
    Label, Landmark, Parent, Pose,
};
