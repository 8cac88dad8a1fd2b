use thiserror::Error;

/// A precondition of a user action that was not met.
///
/// The `Display` text is what the UI shows to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No room photo was attached.
    #[error("Please upload a room photo!")]
    MissingImage,

    /// The prompt was empty or whitespace only.
    #[error("Please describe your dream room!")]
    MissingPrompt,

    /// The attached bytes are not a recognizable image.
    #[error("Please upload an image file.")]
    NotAnImage,

    /// The style label is not part of the catalog.
    #[error("Unknown style: {0}")]
    UnknownStyle(String),
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed session or identity-token data.
    #[error("Session decode error: {0}")]
    SessionDecode(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A transport, status or response-shape failure of the generation call.
    #[error("Network error: {0}")]
    Network(String),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// An I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Network(format!("request timed out: {}", e))
        } else {
            AppError::Network(e.to_string())
        }
    }
}

impl From<sonic_rs::Error> for AppError {
    fn from(e: sonic_rs::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl AppError {
    /// Logs the error at its level and returns the message safe to show a user.
    ///
    /// Validation messages are shown as-is; everything else collapses to a
    /// generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::SessionDecode(msg) => {
                tracing::warn!("Session decode error: {}", msg);
                "Sign-in failed. Please try again.".to_string()
            }

            AppError::Validation(e) => {
                tracing::debug!("Validation error: {}", e);
                e.to_string()
            }

            AppError::Network(msg) => {
                tracing::error!("Network error: {}", msg);
                GENERIC_FAILURE_MESSAGE.to_string()
            }

            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                "Storage error".to_string()
            }

            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                "Storage error".to_string()
            }

            AppError::Serialization(msg) => {
                tracing::error!("Serialization error: {}", msg);
                GENERIC_FAILURE_MESSAGE.to_string()
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

/// The message shown for every failed generation.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";
