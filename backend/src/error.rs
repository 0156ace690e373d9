//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting engine and internal errors to HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lifemode_shared::types::{ErrorDetail, ErrorResponse};
use lifemode_shared::validation::user_message;
use lifemode_shared::HealthError;
use thiserror::Error;
use tracing::{error, warn};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Health(#[from] HealthError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Health(HealthError::ModelUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Health(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Health(HealthError::Validation { .. }) => "VALIDATION_ERROR",
            ApiError::Health(HealthError::UnrecognizedCategory { .. }) => "UNRECOGNIZED_CATEGORY",
            ApiError::Health(HealthError::DivisionByZero(_)) => "DIVISION_BY_ZERO",
            ApiError::Health(HealthError::ModelUnavailable(_)) => "MODEL_UNAVAILABLE",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, field) = match &self {
            ApiError::Health(err) => {
                warn!(code, error = %err, "Analysis rejected");
                (user_message(err), err.field().map(str::to_string))
            }
            ApiError::BadRequest(msg) => (msg.clone(), None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        if matches!(rejection, JsonRejection::JsonDataError(_)) {
            if let Some((field, detail)) = field_from_serde_message(&text) {
                return HealthError::validation(field, detail).into();
            }
        }
        ApiError::BadRequest(text)
    }
}

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Split a body deserialization message into the offending field and detail
///
/// Nested paths keep their last segment and drop any index, so
/// `pain_areas[0]` names `pain_areas`.
fn field_from_serde_message(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(DATA_ERROR_PREFIX)?;
    let (path, detail) = rest.split_once(": ")?;
    if path.is_empty() || path == "." || path.contains(char::is_whitespace) {
        return None;
    }
    let last = path.rsplit('.').next()?;
    let field = last.split('[').next()?;
    (!field.is_empty()).then_some((field, detail))
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
