//! Request rejections and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Reasons an inbound webhook is rejected.
///
/// Every variant is local to one request. Dispatch failures never appear
/// here; they are logged after the response has been sent.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Missing `{0}` signature header")]
    MissingSignature(&'static str),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("The {0} webhook is disabled")]
    SourceDisabled(&'static str),

    #[error("Request body is not valid JSON")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Unrecognized payload")]
    UnrecognizedPayload,
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingSignature(_) => StatusCode::NOT_ACCEPTABLE,
            Self::InvalidSignature => StatusCode::FORBIDDEN,
            Self::SourceDisabled(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MalformedBody(_) | Self::UnrecognizedPayload => StatusCode::BAD_REQUEST,
        }
    }
}

/// JSON body for rejected requests.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
