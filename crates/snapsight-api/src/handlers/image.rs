use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::error::HttpAppError;
use crate::state::AppState;

const ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent";
const ALLOW_METHODS: &str = "OPTIONS,GET,PUT,POST,DELETE";

/// Upload image handler
///
/// Body: `{ "fileName": "...", "imageBase64": "data:image/<subtype>;base64,..." }`. The body is
/// taken as raw bytes so an empty body can be told apart from malformed JSON.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let accepted = state
        .ingress
        .accept(&body)
        .await
        .map_err(|e| state.http_error(e))?;
    tracing::debug!(id = %accepted.id, key = %accepted.key, "Upload accepted");

    Ok(Json(serde_json::json!({ "message": "accepted request" })))
}

/// Static CORS preflight for the upload route.
pub async fn image_preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "false"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
        ],
    )
}
