//! WebServer-specific error types
//!
//! Engine errors keep their kind on the wire; anything else is reported as a
//! generic internal failure after being logged.

use attribution::AttributionError;
use attribution::error::GENERIC_INTERNAL_MESSAGE;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use shared::{ErrorDescriptor, ErrorKind, ProcessId, SharedError, process_error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("HTTP server startup failed: {0}")]
    ServerStartup(String),

    #[error("Invalid request format: {details}")]
    InvalidRequest { details: String },

    #[error("Attribution task failed: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    Attribution(#[from] AttributionError),

    #[error("Shared component error")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type WebServerResult<T> = Result<T, WebServerError>;

impl WebServerError {
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::InvalidRequest {
            details: details.into(),
        }
    }

    /// Wire form of this error
    pub fn descriptor(&self) -> ErrorDescriptor {
        match self {
            Self::Attribution(err) => err.descriptor(),
            Self::InvalidRequest { details } => ErrorDescriptor::new(ErrorKind::Validation, details.clone()),
            _ => ErrorDescriptor::new(ErrorKind::Internal, GENERIC_INTERNAL_MESSAGE),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.descriptor().kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::InfeasibleMethod => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::ComputationTimeout => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let descriptor = self.descriptor();
        let logged_by_engine = matches!(self, Self::Attribution(AttributionError::InternalComputation { .. }));
        if descriptor.kind == ErrorKind::Internal && !logged_by_engine {
            process_error!(ProcessId::current(), "Request failed: {}", self);
        }
        (self.status_code(), Json(json!({ "error": descriptor }))).into_response()
    }
}
