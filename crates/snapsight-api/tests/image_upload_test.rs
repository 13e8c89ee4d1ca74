mod helpers;

use axum::http::Method;
use helpers::{
    setup_local_storage_app, setup_test_app, setup_test_app_with_config, test_config,
    upload_body, BUCKET, HELLO_BASE64, QUEUE_URL,
};
use serde_json::{json, Value};

#[tokio::test]
async fn test_upload_stores_object_and_queues_message() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.png", &format!("data:image/png;base64,{HELLO_BASE64}")))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "message": "accepted request" }));

    let objects = app.storage.objects();
    assert_eq!(objects.len(), 1);
    let object = &objects[0];
    assert_eq!(object.bucket, BUCKET);
    assert_eq!(object.data, b"hello");
    assert_eq!(object.content_type, "image/png");

    let parts: Vec<&str> = object.key.split('/').collect();
    assert_eq!(parts.len(), 3, "unexpected key {}", object.key);
    assert_eq!(parts[0], "uploads");
    assert_eq!(parts[2], "cat.png");
    let id = uuid_from(parts[1]);

    let published = app.queue.published(QUEUE_URL);
    assert_eq!(published.len(), 1);
    let message: Value = serde_json::from_str(&published[0]).unwrap();
    assert_eq!(
        message,
        json!({ "s3FilePath": object.key, "uuid": id })
    );
}

#[tokio::test]
async fn test_each_upload_gets_its_own_id() {
    let app = setup_test_app();
    let body = upload_body("cat.gif", &format!("data:image/gif;base64,{HELLO_BASE64}"));

    for _ in 0..2 {
        let response = app.server.post("/image").json(&body).await;
        assert_eq!(response.status_code(), 200);
    }

    let objects = app.storage.objects();
    assert_eq!(objects.len(), 2);
    assert_ne!(objects[0].key, objects[1].key);
    assert_eq!(app.queue.published(QUEUE_URL).len(), 2);
}

#[tokio::test]
async fn test_empty_body_is_rejected() {
    let app = setup_test_app();

    let response = app.server.post("/image").await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "errors": ["リクエストが不正です"],
            "message": "invalid parameters",
        })
    );
    assert!(app.storage.objects().is_empty());
    assert!(app.queue.published(QUEUE_URL).is_empty());
}

#[tokio::test]
async fn test_disallowed_file_name_extension_is_rejected() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.txt", &format!("data:image/png;base64,{HELLO_BASE64}")))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "errors": ["ファイルの拡張子が不正です"],
            "message": "invalid file extension",
        })
    );
    assert!(app.storage.objects().is_empty());
    assert!(app.queue.published(QUEUE_URL).is_empty());
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let app = setup_test_app();

    let response = app.server.post("/image").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!(["ファイル名が定義されていません"])
    );

    let response = app
        .server
        .post("/image")
        .json(&json!({ "fileName": "cat.png" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!(["ファイルを選択してください"])
    );

    assert!(app.storage.objects().is_empty());
}

#[tokio::test]
async fn test_disallowed_image_format_is_rejected() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.png", "data:image/webp;base64,AAAA"))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "errors": ["ファイルの形式が不正です"],
            "message": "invalid file extension",
        })
    );
    assert!(app.storage.objects().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_internal_error() {
    let app = setup_test_app();

    let response = app.server.post("/image").text("{not json").await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<Value>();
    assert!(body.get("errors").is_none());
    assert!(body["message"].is_string());
    assert!(app.storage.objects().is_empty());
}

#[tokio::test]
async fn test_non_string_fields_are_internal_error() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/image")
        .json(&json!({ "fileName": 42, "imageBase64": "data:image/png;base64,AAAA" }))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(app.storage.objects().is_empty());
}

#[tokio::test]
async fn test_undecodable_payload_is_internal_error() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.png", "data:image/png;base64,@@@"))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(app.storage.objects().is_empty());
    assert!(app.queue.published(QUEUE_URL).is_empty());
}

#[tokio::test]
async fn test_storage_failure_publishes_nothing() {
    let app = setup_test_app();
    app.storage.set_failing(true);

    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.jpg", &format!("data:image/jpeg;base64,{HELLO_BASE64}")))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(app.queue.published(QUEUE_URL).is_empty());
}

#[tokio::test]
async fn test_internal_message_hidden_in_production() {
    let mut config = test_config();
    config.environment = "production".to_string();
    let app = setup_test_app_with_config(config);
    app.storage.set_failing(true);

    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.jpg", &format!("data:image/jpeg;base64,{HELLO_BASE64}")))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Internal server error" })
    );
}

#[tokio::test]
async fn test_internal_message_shown_outside_production() {
    let app = setup_test_app();
    app.storage.set_failing(true);

    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.jpg", &format!("data:image/jpeg;base64,{HELLO_BASE64}")))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Upload failed: simulated outage" })
    );
}

#[tokio::test]
async fn test_file_name_with_consecutive_dots_is_stored_on_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let (server, queue) = setup_local_storage_app(dir.path()).await;

    let response = server
        .post("/image")
        .json(&upload_body("cat..png", &format!("data:image/png;base64,{HELLO_BASE64}")))
        .await;

    assert_eq!(response.status_code(), 200);

    let published = queue.published(QUEUE_URL);
    assert_eq!(published.len(), 1);
    let message: Value = serde_json::from_str(&published[0]).unwrap();
    let key = message["s3FilePath"].as_str().unwrap();
    assert!(key.ends_with("/cat..png"), "unexpected key {key}");

    let written = std::fs::read(dir.path().join(BUCKET).join(key)).unwrap();
    assert_eq!(written, b"hello");
}

#[tokio::test]
async fn test_publish_failure_leaves_stored_object() {
    let app = setup_test_app();
    app.queue.set_failing(true);

    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.jpg", &format!("data:image/jpeg;base64,{HELLO_BASE64}")))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(app.storage.objects().len(), 1);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = test_config();
    config.max_request_body_bytes = 64;
    let app = setup_test_app_with_config(config);

    let payload = "A".repeat(256);
    let response = app
        .server
        .post("/image")
        .json(&upload_body("cat.png", &format!("data:image/png;base64,{payload}")))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.storage.objects().is_empty());
}

#[tokio::test]
async fn test_preflight_returns_static_cors_headers() {
    let app = setup_test_app();

    let response = app.server.method(Method::OPTIONS, "/image").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("access-control-allow-headers"),
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent"
    );
    assert_eq!(response.header("access-control-allow-origin"), "*");
    assert_eq!(response.header("access-control-allow-credentials"), "false");
    assert_eq!(
        response.header("access-control-allow-methods"),
        "OPTIONS,GET,PUT,POST,DELETE"
    );
}

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app();

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "status": "alive" }));
}

fn uuid_from(segment: &str) -> String {
    assert_eq!(segment.len(), 36, "not a hyphenated uuid: {segment}");
    assert_eq!(segment.chars().filter(|c| *c == '-').count(), 4);
    segment.to_string()
}
