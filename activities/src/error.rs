//! Error types for directory operations and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the enroll and remove operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Activity not found")]
    ActivityNotFound { activity: String },

    #[error("Student is already signed up")]
    AlreadySignedUp { activity: String, email: String },

    #[error("Student is not signed up for this activity")]
    NotSignedUp { activity: String, email: String },
}

impl DirectoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::ActivityNotFound { .. } => StatusCode::NOT_FOUND,
            DirectoryError::AlreadySignedUp { .. } => StatusCode::BAD_REQUEST,
            DirectoryError::NotSignedUp { .. } => StatusCode::NOT_FOUND,
        }
    }
}

/// Error returned from HTTP handlers, rendered as `{"detail": ...}`
#[derive(Debug)]
pub struct AppError {
    pub status_code: StatusCode,
    pub message: String,
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError {
            status_code: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Internal server error: {}", err),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "detail": self.message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
