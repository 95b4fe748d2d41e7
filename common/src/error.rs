use thiserror::Error;
use uuid::Uuid;

use crate::document::{DocumentEventType, DocumentLifecycleState};

/// Opaque failure produced by an infrastructure collaborator before the
/// boundary has classified it.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

// Core internal errors
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl DocumentError {
    /// Infrastructure failures are externally caused and potentially
    /// transient; domain failures are caller errors and never retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DocumentError::Infrastructure(_))
    }
}

/// Failures attributable to an external collaborator. The original cause is
/// always preserved as the error source for diagnostics.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Storage error: {operation}")]
    Storage {
        operation: String,
        #[source]
        cause: BoxedCause,
    },
    #[error("Search error: {operation}")]
    Search {
        operation: String,
        #[source]
        cause: BoxedCause,
    },
    #[error("OCR error: {operation}")]
    Ocr {
        operation: String,
        #[source]
        cause: BoxedCause,
    },
    #[error("Messaging error: {operation}")]
    Messaging {
        operation: String,
        #[source]
        cause: BoxedCause,
    },
    #[error("Unexpected error in {operation}")]
    Other {
        operation: String,
        #[source]
        cause: BoxedCause,
    },
}

impl InfrastructureError {
    /// Human-readable label of the collaborator call that failed.
    pub fn operation(&self) -> &str {
        match self {
            InfrastructureError::Storage { operation, .. }
            | InfrastructureError::Search { operation, .. }
            | InfrastructureError::Ocr { operation, .. }
            | InfrastructureError::Messaging { operation, .. }
            | InfrastructureError::Other { operation, .. } => operation,
        }
    }
}

/// Failures attributable to invalid caller behavior or input, independent of
/// any external system.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Document not found: {0}")]
    NotFound(Uuid),
    #[error("Cannot transition from state '{state}' with event '{event}'")]
    IllegalStateTransition {
        state: DocumentLifecycleState,
        event: DocumentEventType,
    },
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },
}
