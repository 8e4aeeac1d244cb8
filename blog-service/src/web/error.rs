//! API error type and its HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::store::StoreError;

/// Errors a request handler can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request body was not a JSON object with string fields
    #[error("Invalid request body")]
    InvalidBody,

    /// `title` or `text` missing or empty
    #[error("Title and text are required")]
    MissingFields,

    /// Path segment is not an integer id
    #[error("Invalid ID")]
    InvalidId,

    #[error("Post not found")]
    NotFound,

    #[error("Not found")]
    NoRoute,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody | ApiError::MissingFields | ApiError::InvalidId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound | ApiError::NoRoute => StatusCode::NOT_FOUND,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
