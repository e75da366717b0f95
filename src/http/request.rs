//! Request decoding.
//!
//! # Responsibilities
//! - Carry path parameters, headers and the buffered body to handlers
//! - Decode JSON bodies into typed request structures
//!
//! # Design Decisions
//! - Missing required fields and malformed JSON are both MalformedBody
//! - Unknown fields are ignored (SDKs may send more than the fake reads)

use std::collections::BTreeSet;

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::http::error::{ApiError, ApiResult};
use crate::routing::PathParams;

pub const INSTANCE_ID: &str = "instanceId";
pub const DEVICE_ID: &str = "deviceId";
pub const INTEREST: &str = "interest";

/// A routed request as seen by a handler.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub params: PathParams,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RouteRequest {
    /// A path parameter the matched template is known to bind.
    pub fn param(&self, name: &'static str) -> ApiResult<&str> {
        self.params.get(name).ok_or(ApiError::MissingParam(name))
    }

    /// The raw `Authorization` header, if present and valid UTF-8.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }

    /// Decode the body as `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> ApiResult<T> {
        decode(&self.body)
    }
}

/// Decode a JSON body into `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// Body of device registration and token update.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDeviceRequest {
    pub token: String,
}

/// Body of the interest replacement endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SetSubscriptionsRequest {
    pub interests: BTreeSet<String>,
}
