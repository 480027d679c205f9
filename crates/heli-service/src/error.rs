//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use heli_core::{FailureEnvelope, StatusMessage};
use tracing::error;

/// Errors surfaced by the HTTP layer
#[derive(Debug)]
pub enum AppError {
    /// Body is not a decodable text request
    InvalidRequest(String),
    /// Body over the configured size limit
    PayloadTooLarge(String),
    /// Request `type` other than `text`
    UnsupportedType(String),
    /// Parameter with the wrong type
    InvalidParameter(String),
    /// Classifier process dead or unresponsive
    ClassifierUnavailable(String),
    /// Anything else
    Internal(String),
}

impl AppError {
    /// Short label used for the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::UnsupportedType(_) => "unsupported_type",
            AppError::InvalidParameter(_) => "invalid_parameter",
            AppError::ClassifierUnavailable(_) => "classifier_unavailable",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<heli_core::Error> for AppError {
    fn from(err: heli_core::Error) -> Self {
        use heli_core::Error;

        if err.is_classifier_failure() {
            return AppError::ClassifierUnavailable(err.to_string());
        }
        match err {
            Error::InvalidParameter(msg) => AppError::InvalidParameter(msg),
            Error::UnsupportedRequest(kind) => AppError::UnsupportedType(kind),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        metrics::counter!("heli_errors_total", "kind" => self.kind()).increment(1);

        // Parameter-type errors keep the internal-error code callers already handle
        let (status, message) = match self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, StatusMessage::invalid_request(msg))
            }
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                StatusMessage::invalid_request(msg),
            ),
            AppError::UnsupportedType(kind) => {
                (StatusCode::BAD_REQUEST, StatusMessage::unsupported_type(kind))
            }
            AppError::InvalidParameter(msg) => {
                (StatusCode::BAD_REQUEST, StatusMessage::internal_error(msg))
            }
            AppError::ClassifierUnavailable(msg) => {
                error!("Classifier unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    StatusMessage::classifier_unavailable(msg),
                )
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    StatusMessage::internal_error(msg),
                )
            }
        };

        (status, Json(FailureEnvelope::from(message))).into_response()
    }
}
