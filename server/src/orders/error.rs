//! Order Domain Errors

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;
use shared::OrderStatus;

/// Errors surfaced by the order lifecycle service.
///
/// `NotFound` and `InvalidOtp` are routine outcomes callers branch on, not
/// exceptional conditions, hence typed variants rather than opaque strings.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order {0} not found")]
    NotFound(i64),

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Courier {0} not found")]
    CourierNotFound(i64),

    #[error("Courier {0} is inactive")]
    CourierInactive(i64),

    #[error("Order {id} cannot take a courier while {status}")]
    NotAssignable { id: i64, status: OrderStatus },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) | OrderError::CourierNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            // Retriable: the courier re-asks the customer and tries again.
            OrderError::InvalidOtp => AppError::Invalid(e.to_string()),
            OrderError::InvalidTransition { .. }
            | OrderError::CourierInactive(_)
            | OrderError::NotAssignable { .. } => AppError::BusinessRule(e.to_string()),
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::Storage(RepoError::Duplicate(msg)) => AppError::Conflict(msg),
            OrderError::Storage(RepoError::NotFound(msg)) => AppError::NotFound(msg),
            OrderError::Storage(RepoError::Validation(msg)) => AppError::Validation(msg),
            OrderError::Storage(RepoError::Database(msg)) => AppError::Database(msg),
        }
    }
}
