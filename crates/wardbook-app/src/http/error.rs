// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wardbook_service::{ServiceError, ServiceErrorCode};

use crate::forms::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    ValidationFailed,
    InvalidQueryParameter,
    AuthFailed,
    NotFound,
    ServiceUnavailable,
    RouteNotFound,
    Internal,
}

/// The error envelope every failing route returns. Service messages pass
/// through verbatim so the operator sees what the service said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"parameter": name, "value": value}),
        )
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.code {
            ApiErrorCode::ValidationFailed | ApiErrorCode::InvalidQueryParameter => {
                StatusCode::BAD_REQUEST
            }
            ApiErrorCode::AuthFailed => StatusCode::UNAUTHORIZED,
            ApiErrorCode::NotFound | ApiErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::ServiceUnavailable => StatusCode::BAD_GATEWAY,
            ApiErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            err.message,
            json!({"fields": err.fields}),
        )
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let code = match err.code {
            ServiceErrorCode::Auth => ApiErrorCode::AuthFailed,
            ServiceErrorCode::Validation => ApiErrorCode::ValidationFailed,
            ServiceErrorCode::NotFound => ApiErrorCode::NotFound,
            ServiceErrorCode::Network => ApiErrorCode::ServiceUnavailable,
            _ => ApiErrorCode::Internal,
        };
        Self::new(code, err.message, Value::Null)
    }
}

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = err.status();
    (status, Json(json!({"error": err}))).into_response()
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiError>();
};
