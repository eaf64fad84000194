use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Generation error: {0}")]
    GenerationFailure(String),
    #[error("Storage upload error: {0}")]
    StorageUploadFailure(String),
    #[error("Persistence error: {0}")]
    PersistenceFailure(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl ThumbnailError {
    /// Short, user-facing summary used as the `message` field of error bodies.
    pub fn summary(&self) -> &'static str {
        match self {
            ThumbnailError::AuthenticationRequired => "You are not logged in",
            ThumbnailError::NotFound(_) => "Thumbnail not found",
            ThumbnailError::GenerationFailure(_)
            | ThumbnailError::StorageUploadFailure(_) => "Failed to generate thumbnail",
            _ => "Internal server error",
        }
    }
}

impl ResponseError for ThumbnailError {
    fn status_code(&self) -> StatusCode {
        match self {
            ThumbnailError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ThumbnailError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.summary(),
            "error": self.to_string(),
        }))
    }
}

impl From<serde_json::Error> for ThumbnailError {
    fn from(e: serde_json::Error) -> Self {
        ThumbnailError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for ThumbnailError {
    fn from(e: std::io::Error) -> Self {
        ThumbnailError::IoError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
