use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;

use super::ImageFileError;

static ALLOWED_SUBTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:jpe?g|png|gif)$").expect("static regex is valid"));

static DATA_URI_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:\w+/\w+;base64,").expect("static regex is valid"));

/// Decoded image payload taken from a `data:<type>/<subtype>;base64,<payload>` string.
///
/// Only the declared MIME subtype is checked; the decoded bytes are never sniffed, so a
/// payload that lies about its format is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFileBody {
    decoded_file: Vec<u8>,
    content_type: String,
    extension: String,
}

impl ImageFileBody {
    pub fn new(data_uri: &str) -> Result<Self, ImageFileError> {
        if data_uri.is_empty() {
            return Err(ImageFileError::MissingFileBody);
        }

        let extension = declared_subtype(data_uri)
            .filter(|subtype| ALLOWED_SUBTYPE.is_match(subtype))
            .ok_or(ImageFileError::InvalidFileBodyFormat)?;

        let payload = DATA_URI_PREFIX.replace(data_uri, "");
        let decoded_file = STANDARD.decode(payload.as_bytes())?;

        Ok(Self {
            decoded_file,
            content_type: declared_content_type(data_uri).to_string(),
            extension: extension.to_string(),
        })
    }

    pub fn decoded_file(&self) -> &[u8] {
        &self.decoded_file
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// Text between the first `/` and the first `;`, when both exist in that order.
fn declared_subtype(data_uri: &str) -> Option<&str> {
    let slash = data_uri.find('/')?;
    let semicolon = data_uri.find(';')?;
    data_uri.get(slash + 1..semicolon)
}

/// Text between the first `:` and the first `;`. Only called once the subtype check passed,
/// so the `;` is known to exist.
fn declared_content_type(data_uri: &str) -> &str {
    let semicolon = data_uri.find(';').unwrap_or(data_uri.len());
    let head = &data_uri[..semicolon];
    let start = head.find(':').map_or(0, |colon| colon + 1);
    &head[start..]
}
