//! Configuration module
//!
//! Settings are read once from the environment into [`Config`]. Each handler receives only the
//! slice it needs ([`IngressConfig`], [`AnalysisConfig`], [`WorkerConfig`]).

use std::env;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 3000;
const MAX_REQUEST_BODY_MB: usize = 10;
const WORKER_MAX_MESSAGES: i32 = 1;
const WORKER_WAIT_TIME_SECONDS: i32 = 20;
const WORKER_ERROR_DELAY_MS: u64 = 1000;

/// Labels requested per image.
pub const MAX_LABELS: i32 = 10;
/// Minimum label confidence, in percent.
pub const MIN_CONFIDENCE: f32 = 1.0;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub bucket_name: String,
    pub queue_url: String,
    pub aws_region: Option<String>,
    // Custom endpoints for S3/SQS-compatible providers (MinIO, LocalStack, ...)
    pub s3_endpoint: Option<String>,
    pub sqs_endpoint: Option<String>,
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub max_request_body_bytes: usize,
    pub worker_enabled: bool,
    pub worker_max_messages: i32,
    pub worker_wait_time_seconds: i32,
    pub worker_error_delay_ms: u64,
    pub log_format: String,
}

/// What the ingress handler needs to store an upload and announce it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngressConfig {
    pub bucket_name: String,
    pub queue_url: String,
}

/// What the analysis handler needs to read an upload and write results next to it.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    pub bucket_name: String,
    pub max_labels: i32,
    pub min_confidence: f32,
}

impl AnalysisConfig {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            max_labels: MAX_LABELS,
            min_confidence: MIN_CONFIDENCE,
        }
    }
}

/// Polling settings for the queue consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    pub queue_url: String,
    pub max_messages: i32,
    pub wait_time_seconds: i32,
    pub error_delay_ms: u64,
}

impl Config {
    /// Defaults for everything except the bucket and queue.
    pub fn new(bucket_name: impl Into<String>, queue_url: impl Into<String>) -> Self {
        Self {
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            bucket_name: bucket_name.into(),
            queue_url: queue_url.into(),
            aws_region: None,
            s3_endpoint: None,
            sqs_endpoint: None,
            storage_backend: StorageBackend::S3,
            local_storage_path: None,
            max_request_body_bytes: MAX_REQUEST_BODY_MB * 1024 * 1024,
            worker_enabled: true,
            worker_max_messages: WORKER_MAX_MESSAGES,
            worker_wait_time_seconds: WORKER_WAIT_TIME_SECONDS,
            worker_error_delay_ms: WORKER_ERROR_DELAY_MS,
            log_format: "pretty".to_string(),
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => StorageBackend::S3,
        };

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
            bucket_name: env::var("BUCKET_NAME").unwrap_or_default(),
            queue_url: env::var("QUEUE_URL").unwrap_or_default(),
            aws_region: env::var("AWS_REGION").ok().filter(|s| !s.is_empty()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            sqs_endpoint: env::var("SQS_ENDPOINT").ok().filter(|s| !s.is_empty()),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok().filter(|s| !s.is_empty()),
            max_request_body_bytes: env::var("MAX_REQUEST_BODY_MB")
                .unwrap_or_else(|_| MAX_REQUEST_BODY_MB.to_string())
                .parse()
                .unwrap_or(MAX_REQUEST_BODY_MB)
                * 1024
                * 1024,
            worker_enabled: env::var("WORKER_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            worker_max_messages: env::var("WORKER_MAX_MESSAGES")
                .unwrap_or_else(|_| WORKER_MAX_MESSAGES.to_string())
                .parse()
                .unwrap_or(WORKER_MAX_MESSAGES),
            worker_wait_time_seconds: env::var("WORKER_WAIT_TIME_SECONDS")
                .unwrap_or_else(|_| WORKER_WAIT_TIME_SECONDS.to_string())
                .parse()
                .unwrap_or(WORKER_WAIT_TIME_SECONDS),
            worker_error_delay_ms: env::var("WORKER_ERROR_DELAY_MS")
                .unwrap_or_else(|_| WORKER_ERROR_DELAY_MS.to_string())
                .parse()
                .unwrap_or(WORKER_ERROR_DELAY_MS),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.bucket_name.trim().is_empty() {
            return Err(anyhow::anyhow!("BUCKET_NAME must be set"));
        }

        if self.queue_url.trim().is_empty() {
            return Err(anyhow::anyhow!("QUEUE_URL must be set"));
        }

        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH to be set"
            ));
        }

        if !(1..=10).contains(&self.worker_max_messages) {
            return Err(anyhow::anyhow!(
                "WORKER_MAX_MESSAGES must be between 1 and 10, got {}",
                self.worker_max_messages
            ));
        }

        if !(0..=20).contains(&self.worker_wait_time_seconds) {
            return Err(anyhow::anyhow!(
                "WORKER_WAIT_TIME_SECONDS must be between 0 and 20, got {}",
                self.worker_wait_time_seconds
            ));
        }

        if self.max_request_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_REQUEST_BODY_MB must be greater than 0"));
        }

        if self.log_format != "pretty" && self.log_format != "json" {
            return Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                self.log_format
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn ingress(&self) -> IngressConfig {
        IngressConfig {
            bucket_name: self.bucket_name.clone(),
            queue_url: self.queue_url.clone(),
        }
    }

    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig::new(self.bucket_name.clone())
    }

    pub fn worker(&self) -> WorkerConfig {
        WorkerConfig {
            queue_url: self.queue_url.clone(),
            max_messages: self.worker_max_messages,
            wait_time_seconds: self.worker_wait_time_seconds,
            error_delay_ms: self.worker_error_delay_ms,
        }
    }
}
