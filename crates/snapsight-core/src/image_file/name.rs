use std::sync::LazyLock;

use regex::Regex;

use super::ImageFileError;

static ALLOWED_NAME_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpe?g|png|gif)$").expect("static regex is valid"));

/// Client-supplied file name, guaranteed non-empty and ending in an allowed image extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFileName {
    name: String,
}

impl ImageFileName {
    pub fn new(name: impl Into<String>) -> Result<Self, ImageFileError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ImageFileError::MissingFileName);
        }
        if !ALLOWED_NAME_EXTENSION.is_match(&name) {
            return Err(ImageFileError::InvalidFileNameExtension);
        }

        Ok(Self { name })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}
