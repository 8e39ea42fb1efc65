//! Error handling module for the FPV builder backend.
//!
//! Provides the HTTP-facing [`AppError`] with its response envelope, and the
//! [`BuildError`] taxonomy raised by the current-build store.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const LOAD_FAILURE: &str = "LOAD_FAILURE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Validation error
    Validation(String),
    /// A saved build could not be loaded into the current build
    LoadFailure(String),
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::LoadFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::LoadFailure(_) => codes::LOAD_FAILURE,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::LoadFailure(msg)
            | AppError::Database(msg)
            | AppError::Internal(msg)
            | AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

/// Why a saved build could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailureReason {
    /// The repository holds no build with the requested id.
    NotFound,
    /// The repository lookup itself failed.
    Repository(String),
}

/// Errors raised by the current-build store.
///
/// Neither variant leaves the build in a partially updated state: an unknown
/// category is rejected before any change, and a failed load never commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The caller named a category outside the five recognized ones.
    UnknownCategory(String),
    /// `load_build_by_id` could not resolve the saved build.
    LoadFailure {
        build_id: i64,
        reason: LoadFailureReason,
    },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::UnknownCategory(category) => {
                write!(f, "Unknown component category: {}", category)
            }
            BuildError::LoadFailure {
                build_id,
                reason: LoadFailureReason::NotFound,
            } => write!(f, "Build {} not found", build_id),
            BuildError::LoadFailure {
                build_id,
                reason: LoadFailureReason::Repository(msg),
            } => write!(f, "Failed to load build {}: {}", build_id, msg),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        let message = err.to_string();
        match err {
            BuildError::UnknownCategory(_) => AppError::Validation(message),
            BuildError::LoadFailure {
                reason: LoadFailureReason::NotFound,
                ..
            } => AppError::NotFound(message),
            BuildError::LoadFailure {
                reason: LoadFailureReason::Repository(_),
                ..
            } => AppError::LoadFailure(message),
        }
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub revision_id: i64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, revision_id: i64) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
            revision_id,
        }
    }
}

/// Wrapper type for errors that carry revision_id context.
pub struct AppErrorWithRevision {
    pub error: AppError,
    pub revision_id: i64,
}

impl IntoResponse for AppErrorWithRevision {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.revision_id);
        (status, Json(body)).into_response()
    }
}
