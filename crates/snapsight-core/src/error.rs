//! Error types module
//!
//! Errors that reach the HTTP boundary are unified under [`AppError`], a tagged enum with two
//! families: [`UserInvalid`] (client-caused, 400..=499, carries localized display messages) and
//! internal failures (500). Boundary code matches on the tag and reads the response shape from
//! [`ErrorMetadata`].

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "USER_INVALID")
    fn error_code(&self) -> &'static str;

    /// Localized messages meant for end users. Empty for internal errors.
    fn display_errors(&self) -> &[String];

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Rejected attempt to build a [`UserInvalid`] from inconsistent parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserInvalidError {
    #[error("invalid status code {0}: user invalid errors must be within 400..=499")]
    StatusOutOfRange(u16),

    #[error("user invalid errors need at least one display message")]
    NoDisplayErrors,
}

/// Client-caused failure with a 4xx status and one or more display messages.
///
/// Fields are private so every instance satisfies the status range and the non-empty display
/// list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UserInvalid {
    message: String,
    display_errors: Vec<String>,
    status: u16,
}

impl UserInvalid {
    pub fn new(
        message: impl Into<String>,
        display_errors: Vec<String>,
        status: u16,
    ) -> Result<Self, UserInvalidError> {
        if !(400..=499).contains(&status) {
            return Err(UserInvalidError::StatusOutOfRange(status));
        }
        if display_errors.is_empty() {
            return Err(UserInvalidError::NoDisplayErrors);
        }

        Ok(Self {
            message: message.into(),
            display_errors,
            status,
        })
    }

    /// 400 with a single display message.
    pub fn bad_request(message: impl Into<String>, display_error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            display_errors: vec![display_error.into()],
            status: 400,
        }
    }

    /// 404 with the generic `Not Found` display message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            display_errors: vec!["Not Found".to_string()],
            status: 404,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn display_errors(&self) -> &[String] {
        &self.display_errors
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("User invalid: {0}")]
    UserInvalid(#[from] UserInvalid),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

// A body that is present but not parseable is not a validation failure: it is reported the
// same way as any other unexpected error.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::UserInvalid(_) => "UserInvalid",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "InternalServer",
        }
    }

    /// The underlying message, without the variant prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            AppError::UserInvalid(inner) => inner.message(),
            AppError::Internal(message) => message,
            AppError::InternalWithSource { message, .. } => message,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.message().to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::UserInvalid(inner) => inner.status(),
            _ => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::UserInvalid(inner) if inner.status() == 404 => "NOT_FOUND",
            AppError::UserInvalid(_) => "USER_INVALID",
            _ => "INTERNAL_ERROR",
        }
    }

    fn display_errors(&self) -> &[String] {
        match self {
            AppError::UserInvalid(inner) => inner.display_errors(),
            _ => &[],
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::UserInvalid(inner) => inner.message().to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        !matches!(self, AppError::UserInvalid(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::UserInvalid(_) => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }
}
