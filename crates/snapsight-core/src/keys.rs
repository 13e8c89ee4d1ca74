//! Object key layout shared by ingress and analysis.
//!
//! Everything for one upload lives under `uploads/<uuid>/`.

const UPLOAD_PREFIX: &str = "uploads";

pub const LABEL_RESULT_FILE: &str = "detect-label-result.json";
pub const FACE_RESULT_FILE: &str = "detect-face-result.json";

/// `uploads/<id>/<file_name>`
pub fn upload_key(id: &str, file_name: &str) -> String {
    format!("{UPLOAD_PREFIX}/{id}/{file_name}")
}

pub fn label_result_key(id: &str) -> String {
    upload_key(id, LABEL_RESULT_FILE)
}

pub fn face_result_key(id: &str) -> String {
    upload_key(id, FACE_RESULT_FILE)
}
