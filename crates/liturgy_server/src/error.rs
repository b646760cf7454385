//! HTTP-facing error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use liturgy_docs::ValidationError;
use liturgy_docs::payload::REQUIRED_FIELDS;
use serde::Serialize;

/// Every way a request can fail, mapped onto one HTTP status each.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body is missing required fields or does not decode.
    #[error("Invalid request: missing {}", .required.join(", "))]
    InvalidRequest {
        required: Vec<&'static str>,
        message: Option<String>,
    },

    #[error("Method not allowed. Use POST.")]
    MethodNotAllowed,

    /// Composition, rendering or the render task itself failed.
    #[error("Failed to generate document: {0}")]
    Generation(String),
}

impl ApiError {
    /// The body was not JSON at all.
    pub fn undecodable(detail: impl ToString) -> Self {
        Self::InvalidRequest {
            required: REQUIRED_FIELDS.to_vec(),
            message: Some(detail.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let message = match &err {
            ValidationError::MissingFields(_) => None,
            ValidationError::Malformed(detail) => Some(detail.clone()),
        };
        Self::InvalidRequest {
            required: err.required(),
            message,
        }
    }
}

impl From<liturgy_docs::DocsError> for ApiError {
    fn from(err: liturgy_docs::DocsError) -> Self {
        Self::Generation(err.to_string())
    }
}

/// JSON error body
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<&'a [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl ApiError {
    fn body(&self) -> ErrorBody<'_> {
        match self {
            Self::InvalidRequest { required, message } => ErrorBody {
                error: "Invalid request",
                required: Some(required.as_slice()),
                message: message.as_deref(),
            },
            Self::MethodNotAllowed => ErrorBody {
                error: "Method not allowed. Use POST.",
                required: None,
                message: None,
            },
            Self::Generation(message) => ErrorBody {
                error: "Failed to generate document",
                required: None,
                message: Some(message.as_str()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
