//! Error types and HTTP response mapping.
//!
//! `DriveError` is what a directory client returns; `AppError` is what handlers
//! return. `AppError` implements Axum's `IntoResponse` so every failure reaches
//! the page as a JSON body with a matching status code.
//!
//! Error mappings:
//! - `Auth` → 401 (the page forces a fresh login)
//! - `NotInitialized` → 503
//! - `Remote` → 502
//! - `NotFound` → 404
//! - `NotVisible`, `BreadcrumbOutOfRange`, `InvalidRequest` → 400
//! - `Internal` → 500

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures reported by a directory client.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Drive client is not initialized")]
    NotInitialized,

    #[error("Drive request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Drive request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid Drive endpoint: {0}")]
    Endpoint(String),

    #[error("Unexpected Drive response: {0}")]
    Decode(String),

    #[error("File not found: {0}")]
    NotFound(String),
}

pub type DriveResult<T> = std::result::Result<T, DriveError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required: {0}")]
    Auth(String),

    #[error("Drive client is not initialized")]
    NotInitialized,

    #[error("Drive error: {0}")]
    Remote(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File is not in the current listing: {0}")]
    NotVisible(String),

    #[error("Breadcrumb index {index} out of range (path length {len})")]
    BreadcrumbOutOfRange { index: usize, len: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DriveError> for AppError {
    fn from(err: DriveError) -> Self {
        match err {
            DriveError::Auth(msg) => AppError::Auth(msg),
            DriveError::NotInitialized => AppError::NotInitialized,
            DriveError::NotFound(id) => AppError::NotFound(id),
            other => AppError::Remote(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Remote(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotVisible(_)
            | AppError::BreadcrumbOutOfRange { .. }
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
