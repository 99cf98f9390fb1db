//! Error types for HTTP handlers

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use vault_core::api::MessageResponse;

/// Failures of the JSON document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors returned by route handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request did not identify a user
    #[error("Unauthorized")]
    Unauthorized,

    #[error("User already exists")]
    UserExists,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::UserExists => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
