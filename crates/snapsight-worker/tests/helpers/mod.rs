//! In-memory collaborators for analysis and consumer tests.
//!
//! Run from workspace root: `cargo test -p snapsight-worker`.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use snapsight_core::{AnalysisConfig, WorkerConfig};
use snapsight_storage::{ObjectStorage, StorageBackend, StorageError, StorageResult};
use snapsight_vision::{BoolAttribute, Detector, FaceDetail, Label, VisionError};
use snapsight_worker::{AnalysisHandler, MessageQueue, QueueError, QueueRecord};

pub const BUCKET: &str = "snapsight-test-bucket";
pub const QUEUE_URL: &str = "http://localhost:4566/000000000000/snapsight-analysis";

/// A delivered record with a receipt handle derived from its id.
pub fn queue_record(message_id: &str, body: impl Into<String>) -> QueueRecord {
    QueueRecord {
        message_id: message_id.to_string(),
        body: body.into(),
        receipt_handle: Some(format!("receipt-{message_id}")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Object storage keeping everything in a map keyed by (bucket, key).
#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    fail_keys_ending_with: Mutex<Option<String>>,
}

impl MockStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every put whose key ends with `suffix` fail.
    pub fn fail_puts_ending_with(&self, suffix: &str) {
        *self.fail_keys_ending_with.lock().unwrap() = Some(suffix.to_string());
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        if let Some(suffix) = self.fail_keys_ending_with.lock().unwrap().as_deref() {
            if key.ends_with(suffix) {
                return Err(StorageError::UploadFailed("simulated outage".to_string()));
            }
        }

        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelCall {
    pub bucket: String,
    pub key: String,
    pub max_labels: i32,
    pub min_confidence: f32,
}

/// Detector returning canned results and recording what it was asked.
pub struct MockDetector {
    labels: Result<Vec<Label>, String>,
    faces: Result<Vec<FaceDetail>, String>,
    pub label_calls: Mutex<Vec<LabelCall>>,
    pub face_calls: Mutex<Vec<(String, String, bool)>>,
}

impl MockDetector {
    pub fn new(
        labels: Result<Vec<Label>, String>,
        faces: Result<Vec<FaceDetail>, String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            labels,
            faces,
            label_calls: Mutex::new(Vec::new()),
            face_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn succeeding() -> Arc<Self> {
        Self::new(Ok(sample_labels()), Ok(sample_faces()))
    }

    pub fn calls(&self) -> usize {
        self.label_calls.lock().unwrap().len() + self.face_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Detector for MockDetector {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
        min_confidence: f32,
    ) -> Result<Vec<Label>, VisionError> {
        self.label_calls.lock().unwrap().push(LabelCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            max_labels,
            min_confidence,
        });
        self.labels.clone().map_err(VisionError::LabelDetectionFailed)
    }

    async fn detect_faces(
        &self,
        bucket: &str,
        key: &str,
        all_attributes: bool,
    ) -> Result<Vec<FaceDetail>, VisionError> {
        self.face_calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), all_attributes));
        self.faces.clone().map_err(VisionError::FaceDetectionFailed)
    }
}

/// Queue serving pre-loaded batches. Once drained, `receive` waits briefly and returns
/// nothing, like an idle long poll.
#[derive(Default)]
pub struct MockQueue {
    batches: Mutex<VecDeque<Result<Vec<QueueRecord>, String>>>,
    pub published: Mutex<Vec<(String, String)>>,
    pub acknowledged: Mutex<Vec<String>>,
    pub receive_calls: AtomicUsize,
}

impl MockQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_batch(&self, records: Vec<QueueRecord>) {
        self.batches.lock().unwrap().push_back(Ok(records));
    }

    pub fn push_receive_error(&self, reason: &str) {
        self.batches.lock().unwrap().push_back(Err(reason.to_string()));
    }

    pub fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageQueue for MockQueue {
    async fn publish(&self, queue_url: &str, body: &str) -> Result<(), QueueError> {
        self.published
            .lock()
            .unwrap()
            .push((queue_url.to_string(), body.to_string()));
        Ok(())
    }

    async fn receive(
        &self,
        _queue_url: &str,
        _max_messages: i32,
        _wait_time_seconds: i32,
    ) -> Result<Vec<QueueRecord>, QueueError> {
        self.receive_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(Ok(records)) => Ok(records),
            Some(Err(reason)) => Err(QueueError::ReceiveFailed(reason)),
            None => {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn acknowledge(&self, _queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        self.acknowledged
            .lock()
            .unwrap()
            .push(receipt_handle.to_string());
        Ok(())
    }
}

pub fn sample_labels() -> Vec<Label> {
    vec![
        Label {
            name: Some("Cat".to_string()),
            confidence: Some(99.0),
            ..Default::default()
        },
        Label {
            name: Some("Pet".to_string()),
            confidence: Some(97.5),
            ..Default::default()
        },
    ]
}

pub fn sample_faces() -> Vec<FaceDetail> {
    vec![FaceDetail {
        confidence: Some(99.0),
        smile: Some(BoolAttribute {
            value: Some(true),
            confidence: Some(90.0),
        }),
        ..Default::default()
    }]
}

pub fn message_body(s3_file_path: &str, uuid: &str) -> String {
    serde_json::json!({ "s3FilePath": s3_file_path, "uuid": uuid }).to_string()
}

pub fn handler(storage: Arc<MockStorage>, detector: Arc<MockDetector>) -> AnalysisHandler {
    AnalysisHandler::new(AnalysisConfig::new(BUCKET), storage, detector)
}

pub fn worker_config() -> WorkerConfig {
    WorkerConfig {
        queue_url: QUEUE_URL.to_string(),
        max_messages: 1,
        wait_time_seconds: 0,
        error_delay_ms: 10,
    }
}
