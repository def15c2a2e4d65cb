/// API error type and its HTTP mapping
///
/// Every handler returns `Result<_, ApiError>`. Internal failures are logged here and
/// answered with a generic message so no storage or decoder detail reaches clients.

use crate::{extractor::DocumentError, storage::StorageError, validation::FieldError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Field-level detail, present for validation failures only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing fields (400)
    Validation {
        message: &'static str,
        errors: Vec<FieldError>,
    },
    /// Unknown identifier (404)
    NotFound(&'static str),
    /// The document held no usable name or email (422)
    ExtractionFailed,
    /// Document type the service cannot read (415)
    UnsupportedMedia(String),
    /// Anything else (500); the detail is only logged
    Internal {
        message: &'static str,
        detail: String,
    },
}

/// Warning shown when a document yields nothing usable
pub const EXTRACTION_FAILED_MESSAGE: &str = "Could not extract name and email from document. Please ensure the document contains clear name and email information.";

impl ApiError {
    pub fn validation(message: &'static str, errors: Vec<FieldError>) -> Self {
        ApiError::Validation { message, errors }
    }

    /// Wrap an unexpected failure with the public message for this operation
    pub fn internal(message: &'static str, detail: impl ToString) -> Self {
        ApiError::Internal {
            message,
            detail: detail.to_string(),
        }
    }

    /// Map a storage failure to a 500 with the given public message
    pub fn storage(message: &'static str) -> impl FnOnce(StorageError) -> ApiError {
        move |e| ApiError::internal(message, e)
    }
}

impl From<DocumentError> for ApiError {
    fn from(error: DocumentError) -> Self {
        match error {
            DocumentError::UnsupportedFormat(_) | DocumentError::OcrUnavailable => {
                ApiError::UnsupportedMedia(error.to_string())
            }
            DocumentError::Decode(_) => ApiError::ExtractionFailed,
            DocumentError::Task(e) => ApiError::internal("Error processing document", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation { message, errors } => {
                tracing::warn!("Rejected request: {} ({} field errors)", message, errors.len());
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        message: message.to_string(),
                        errors,
                    },
                )
            }
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    message: message.to_string(),
                    errors: Vec::new(),
                },
            ),
            ApiError::ExtractionFailed => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    message: EXTRACTION_FAILED_MESSAGE.to_string(),
                    errors: Vec::new(),
                },
            ),
            ApiError::UnsupportedMedia(message) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorResponse {
                    message,
                    errors: Vec::new(),
                },
            ),
            ApiError::Internal { message, detail } => {
                tracing::error!("❌ {}: {}", message, detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: message.to_string(),
                        errors: Vec::new(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Parse a raw request body as JSON, reporting syntax errors as a validation failure
pub fn parse_json_body(
    body: &str,
    message: &'static str,
) -> Result<serde_json::Value, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::debug!("Invalid JSON body: {}", e);
        ApiError::validation(message, vec![FieldError::body(format!("Invalid JSON: {}", e))])
    })
}

/// Parse a path identifier. Non-numeric ids can never exist, so they read as not found.
pub fn parse_id(raw: &str, not_found: &'static str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::NotFound(not_found))
}
