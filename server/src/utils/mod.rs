//! Utility Module
//!
//! - [`AppError`] / [`AppResponse`] - application error type and response envelope
//! - [`AppResult`] - handler result alias
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{ok, ok_with_message};
pub use error::{AppError, AppResponse};
pub use result::AppResult;
