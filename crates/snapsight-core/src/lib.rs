//! Snapsight Core Library
//!
//! Domain value objects for uploaded images, the queue message contract, the error taxonomy,
//! and configuration shared by the API and the analysis worker.

pub mod config;
pub mod error;
pub mod image_file;
pub mod keys;
pub mod message;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AnalysisConfig, Config, IngressConfig, WorkerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel, UserInvalid, UserInvalidError};
pub use image_file::{ImageFile, ImageFileBody, ImageFileError, ImageFileName};
pub use message::{MessageError, QueueMessage};
pub use storage_types::StorageBackend;
