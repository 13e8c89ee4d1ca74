//! Test server and in-memory collaborators for the upload API.
//!
//! Run from workspace root: `cargo test -p snapsight-api`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use snapsight_api::setup::routes::setup_routes;
use snapsight_api::{AppState, IngressHandler};
use snapsight_core::Config;
use snapsight_storage::{
    LocalStorage, ObjectStorage, StorageBackend, StorageError, StorageResult,
};
use snapsight_worker::{MessageQueue, QueueError, QueueRecord};

pub const BUCKET: &str = "snapsight-test-bucket";
pub const QUEUE_URL: &str = "http://localhost:4566/000000000000/snapsight-analysis";

/// "hello" as a base64 payload.
pub const HELLO_BASE64: &str = "aGVsbG8=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<Vec<StoredObject>>,
    failing: AtomicBool,
}

impl MockStorage {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
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
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("simulated outage".to_string()));
        }

        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            data,
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[derive(Default)]
pub struct MockQueue {
    published: Mutex<HashMap<String, Vec<String>>>,
    failing: AtomicBool,
}

impl MockQueue {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Bodies published to `queue_url`, in order.
    pub fn published(&self, queue_url: &str) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .get(queue_url)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl MessageQueue for MockQueue {
    async fn publish(&self, queue_url: &str, body: &str) -> Result<(), QueueError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(QueueError::PublishFailed("simulated outage".to_string()));
        }

        self.published
            .lock()
            .unwrap()
            .entry(queue_url.to_string())
            .or_default()
            .push(body.to_string());
        Ok(())
    }

    async fn receive(
        &self,
        _queue_url: &str,
        _max_messages: i32,
        _wait_time_seconds: i32,
    ) -> Result<Vec<QueueRecord>, QueueError> {
        Ok(Vec::new())
    }

    async fn acknowledge(&self, _queue_url: &str, _receipt_handle: &str) -> Result<(), QueueError> {
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MockStorage>,
    pub queue: Arc<MockQueue>,
}

pub fn test_config() -> Config {
    Config::new(BUCKET, QUEUE_URL)
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_config(test_config())
}

pub fn setup_test_app_with_config(config: Config) -> TestApp {
    let storage = Arc::new(MockStorage::default());
    let queue = Arc::new(MockQueue::default());

    let server = test_server(&config, storage.clone(), queue.clone());

    TestApp {
        server,
        storage,
        queue,
    }
}

/// App writing uploads to a [`LocalStorage`] rooted at `base_path`.
pub async fn setup_local_storage_app(base_path: &Path) -> (TestServer, Arc<MockQueue>) {
    let storage = LocalStorage::new(base_path)
        .await
        .expect("Failed to create local storage");
    let queue = Arc::new(MockQueue::default());

    let server = test_server(&test_config(), Arc::new(storage), queue.clone());
    (server, queue)
}

fn test_server(
    config: &Config,
    storage: Arc<dyn ObjectStorage>,
    queue: Arc<dyn MessageQueue>,
) -> TestServer {
    let ingress = IngressHandler::new(config.ingress(), storage, queue);
    let state = Arc::new(AppState::new(ingress, config.is_production()));
    let app = setup_routes(config, state);

    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

pub fn upload_body(file_name: &str, image_base64: &str) -> serde_json::Value {
    serde_json::json!({
        "fileName": file_name,
        "imageBase64": image_base64,
    })
}
