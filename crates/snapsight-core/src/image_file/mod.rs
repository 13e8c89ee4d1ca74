//! Uploaded image value objects.
//!
//! [`ImageFileName`] and [`ImageFileBody`] validate eagerly at construction; [`ImageFile`]
//! adds no checks of its own and only assigns the upload id.

mod body;
mod name;

pub use body::ImageFileBody;
pub use name::ImageFileName;

use uuid::Uuid;

use crate::error::{AppError, UserInvalid};
use crate::keys;

/// Validation failures for an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageFileError {
    #[error("image file name is required")]
    MissingFileName,

    #[error("invalid file extension")]
    InvalidFileNameExtension,

    #[error("file is required")]
    MissingFileBody,

    #[error("invalid file extension")]
    InvalidFileBodyFormat,

    #[error("base64 decode failed: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl ImageFileError {
    /// Whether the client is at fault. Decoder failures are not.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, ImageFileError::Decode(_))
    }

    /// Localized message shown to the uploader.
    pub fn display_message(&self) -> Option<&'static str> {
        match self {
            ImageFileError::MissingFileName => Some("ファイル名が定義されていません"),
            ImageFileError::InvalidFileNameExtension => Some("ファイルの拡張子が不正です"),
            ImageFileError::MissingFileBody => Some("ファイルを選択してください"),
            ImageFileError::InvalidFileBodyFormat => Some("ファイルの形式が不正です"),
            ImageFileError::Decode(_) => None,
        }
    }
}

impl From<ImageFileError> for AppError {
    fn from(err: ImageFileError) -> Self {
        match err.display_message() {
            Some(display) => {
                AppError::UserInvalid(UserInvalid::bad_request(err.to_string(), display))
            }
            None => AppError::Internal(err.to_string()),
        }
    }
}

/// A validated upload with its correlation id.
#[derive(Debug, Clone)]
pub struct ImageFile {
    id: Uuid,
    file_name: ImageFileName,
    file_body: ImageFileBody,
}

impl ImageFile {
    pub fn new(file_name: ImageFileName, file_body: ImageFileBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            file_body,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn body(&self) -> &[u8] {
        self.file_body.decoded_file()
    }

    pub fn name(&self) -> &str {
        self.file_name.as_str()
    }

    pub fn content_type(&self) -> &str {
        self.file_body.content_type()
    }

    pub fn file_extension(&self) -> &str {
        self.file_body.extension()
    }

    /// `uploads/<id>/<name>`
    pub fn storage_key(&self) -> String {
        keys::upload_key(&self.id.to_string(), self.name())
    }
}
