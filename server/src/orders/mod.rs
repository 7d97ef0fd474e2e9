//! Order Lifecycle
//!
//! The one part of the system with real invariants: the status state
//! machine, OTP issuance and verification, and courier assignment.

pub mod error;
pub mod lifecycle;

pub use error::OrderError;
pub use lifecycle::OrderLifecycle;
