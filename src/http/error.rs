//! HTTP-facing error taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::TokenError;
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every way a request can fail. None of these are fatal to the server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No registered template matched the method and path.
    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("device {0} not found")]
    DeviceNotFound(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("missing authorization header")]
    MissingAuthorization,

    #[error(transparent)]
    InvalidToken(#[from] TokenError),

    #[error("missing path parameter {0}")]
    MissingParam(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound { .. } | ApiError::DeviceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MalformedBody(_)
            | ApiError::MissingAuthorization
            | ApiError::InvalidToken(_)
            | ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DeviceNotFound(id) => ApiError::DeviceNotFound(id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Transport-level miss keeps a body so it can be told apart from a missing device.
            ApiError::RouteNotFound { .. } => {
                (StatusCode::NOT_FOUND, "No matching route found").into_response()
            }
            other => other.status().into_response(),
        }
    }
}
