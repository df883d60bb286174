//! Attribution engine error types

use shared::{ErrorDescriptor, ErrorKind, SharedError};
use thiserror::Error;

/// Message returned to callers in place of internal failure details
pub const GENERIC_INTERNAL_MESSAGE: &str = "internal computation failure";

#[derive(Error, Debug)]
pub enum AttributionError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Exact computation infeasible for {touchpoints} touchpoints (threshold {threshold})")]
    InfeasibleMethod { touchpoints: usize, threshold: usize },

    #[error("Sampling budget exhausted after {samples} permutations (minimum {min_samples})")]
    ComputationTimeout { samples: u64, min_samples: u64 },

    #[error("Internal computation error: {message}")]
    InternalComputation { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AttributionError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AttributionError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AttributionError::InternalComputation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AttributionError::Validation { .. } => ErrorKind::Validation,
            AttributionError::InfeasibleMethod { .. } => ErrorKind::InfeasibleMethod,
            AttributionError::ComputationTimeout { .. } => ErrorKind::ComputationTimeout,
            _ => ErrorKind::Internal,
        }
    }

    /// Caller-facing form; internal failures are reduced to a generic message
    pub fn descriptor(&self) -> ErrorDescriptor {
        match self.kind() {
            ErrorKind::Internal => ErrorDescriptor::new(ErrorKind::Internal, GENERIC_INTERNAL_MESSAGE),
            kind => ErrorDescriptor::new(kind, self.to_string()),
        }
    }
}

pub type AttributionResult<T> = Result<T, AttributionError>;
