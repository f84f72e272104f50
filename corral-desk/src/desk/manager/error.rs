use super::super::storage::StorageError;
use shared::order::{DeskFault, DeskFaultCode};
use thiserror::Error;

/// Desk errors
#[derive(Debug, Error)]
pub enum DeskError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Slot not found: {0}")]
    SlotNotFound(u64),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Line not found: {0}")]
    LineNotFound(String),

    #[error("No ready drafts to queue")]
    NoReadyDrafts,

    #[error("Queue is empty")]
    EmptyQueue,

    #[error("Product is required")]
    ProductRequired,

    #[error("Unknown product: {0}")]
    ProductUnknown(String),

    #[error("Variety is required for product: {0}")]
    VarietyRequired(String),

    #[error("Presentation is required")]
    PresentationRequired,

    #[error("Quantity is required: {0}")]
    QuantityRequired(String),

    #[error("Confirmed-order store rejected the batch: {0}")]
    StoreRejected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Map a storage failure to a user-facing code. Serialization failures are
/// programming errors, everything else is an I/O-level storage fault.
fn classify_storage_error(e: &StorageError) -> DeskFaultCode {
    match e {
        StorageError::Serialization(_) => DeskFaultCode::InternalError,
        _ => DeskFaultCode::StorageError,
    }
}

impl From<DeskError> for DeskFault {
    fn from(err: DeskError) -> Self {
        let (code, message) = match err {
            DeskError::Storage(e) => {
                let code = classify_storage_error(&e);
                let message = e.to_string();
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                (code, message)
            }
            DeskError::SlotNotFound(id) => {
                (DeskFaultCode::SlotNotFound, format!("Slot not found: {}", id))
            }
            DeskError::OrderNotFound(id) => (
                DeskFaultCode::OrderNotFound,
                format!("Order not found: {}", id),
            ),
            DeskError::LineNotFound(id) => (
                DeskFaultCode::LineNotFound,
                format!("Line not found: {}", id),
            ),
            DeskError::NoReadyDrafts => (
                DeskFaultCode::NoReadyDrafts,
                "No ready drafts to queue".to_string(),
            ),
            DeskError::EmptyQueue => (DeskFaultCode::EmptyQueue, "Queue is empty".to_string()),
            DeskError::ProductRequired => (
                DeskFaultCode::ProductRequired,
                "Product is required".to_string(),
            ),
            DeskError::ProductUnknown(name) => (
                DeskFaultCode::ProductUnknown,
                format!("Unknown product: {}", name),
            ),
            DeskError::VarietyRequired(product) => (
                DeskFaultCode::VarietyRequired,
                format!("Variety is required for product: {}", product),
            ),
            DeskError::PresentationRequired => (
                DeskFaultCode::PresentationRequired,
                "Presentation is required".to_string(),
            ),
            DeskError::QuantityRequired(msg) => (DeskFaultCode::QuantityRequired, msg),
            DeskError::StoreRejected(msg) => (DeskFaultCode::StoreRejected, msg),
            DeskError::Internal(msg) => (DeskFaultCode::InternalError, msg),
        };
        DeskFault::new(code, message)
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
