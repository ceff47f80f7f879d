// ABOUTME: Unified error handling for the HTTP boundary
// ABOUTME: Error codes with HTTP status mapping and axum response conversion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! HTTP-boundary error handling.
//!
//! [`AppError`] is the error type route handlers return; it maps onto an
//! HTTP status and a JSON body of the form `{"error": ..., "code": ...,
//! "details": ...}`. Typed provider errors convert losslessly, preserving
//! their stable code in the payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use forkful_core::ProviderError;

/// Standard error codes used at the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    /// Request validation failure
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// The requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// An outbound quota was exhausted
    #[serde(rename = "RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded,
    /// An upstream service failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// A required service is not configured or not available
    #[serde(rename = "SERVICE_UNAVAILABLE")]
    ServiceUnavailable,
    /// Configuration problem
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error code
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::ExternalServiceError => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ConfigError | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unified error type for route handlers
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    /// Error classification
    pub code: ErrorCode,
    /// Human-readable message, returned as the `error` field
    pub message: String,
    /// Structured details for the response body
    pub details: Option<serde_json::Value>,
}

/// Result type alias for route handlers
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an error with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to the response body
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Request validation failure
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing resource
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Unexpected internal failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration problem
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

/// JSON body of an error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Stable code, when the failure carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Structured details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        let body = ErrorResponse {
            error: self.message,
            code: serde_json::to_value(self.code)
                .ok()
                .and_then(|value| value.as_str().map(str::to_owned)),
            details: self.details,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        let code = match err.http_status() {
            400 => ErrorCode::InvalidInput,
            404 => ErrorCode::ResourceNotFound,
            429 => ErrorCode::RateLimitExceeded,
            502 => ErrorCode::ExternalServiceError,
            503 => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::InternalError,
        };
        let details = serde_json::json!({
            "providerCode": err.code(),
            "provider": err.provider().map(|source| source.as_str()),
        });
        Self::new(code, err.to_string()).with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkful_core::FoodSource;

    #[test]
    fn error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::RateLimitExceeded.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn provider_error_preserves_code_in_details() {
        let app_err: AppError = ProviderError::RateLimitMinute {
            provider: FoodSource::FdcUsda,
            limit: 30,
        }
        .into();
        assert_eq!(app_err.code, ErrorCode::RateLimitExceeded);
        let details = app_err.details.unwrap();
        assert_eq!(details["providerCode"], "RATE_LIMIT_MINUTE");
        assert_eq!(details["provider"], "fdc_usda");
    }
}
