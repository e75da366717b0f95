//! Response encoding.
//!
//! # Responsibilities
//! - Pair a status code with an optional JSON body
//! - Define the response shapes the SDK reads
//!
//! # Design Decisions
//! - Bodyless replies carry only the status (empty body, no content type)
//! - Absent optional fields are omitted rather than sent as null

use std::collections::BTreeSet;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A handler result ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Option<serde_json::Value>,
}

impl Reply {
    /// 200 with no body.
    pub fn ok() -> Self {
        Self::empty(StatusCode::OK)
    }

    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    /// 200 with `value` as the JSON body.
    pub fn json<T: Serialize>(value: &T) -> Self {
        Self::with_status(StatusCode::OK, value)
    }

    pub fn with_status<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status, body: Some(body) },
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode response body");
                Self::empty(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        encode(self.status, self.body.as_ref())
    }
}

/// Encode a status and optional JSON value into a response.
pub fn encode<T: Serialize>(status: StatusCode, value: Option<&T>) -> Response {
    let Some(value) = value else {
        return status.into_response();
    };

    match serde_json::to_vec(value) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Returned by device registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeviceResponse {
    pub id: String,
    pub initial_interest_set: BTreeSet<String>,
}

/// Placeholder metadata; the fake does not track it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetadata {
    pub sdk_version: String,
    pub android_version: String,
}

/// Returned by device lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeviceResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub device_metadata: DeviceMetadata,
}

/// Returned by interest listing.
#[derive(Debug, Clone, Serialize)]
pub struct GetInterestsResponse {
    pub interests: BTreeSet<String>,
}
