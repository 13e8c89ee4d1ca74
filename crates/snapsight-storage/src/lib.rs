//! Snapsight Storage Library
//!
//! Object storage abstraction used by ingress (to store uploads) and analysis (to store
//! detection results). Objects are addressed by bucket and key; the key layout lives in
//! `snapsight_core::keys`.
//!
//! Keys must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use snapsight_core::StorageBackend;
pub use traits::{ObjectStorage, StorageError, StorageResult};
