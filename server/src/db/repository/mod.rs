//! Repository Module
//!
//! CRUD operations over the storage engine, one repository per entity.
//! Lookups for missing ids return `Ok(None)` / `false`; only create/update
//! operations surface errors (duplicates, hashing failures). Callers decide
//! how a missing record maps to their own error type.

// Auth
pub mod admin_user;
pub mod courier;

// Orders
pub mod order;

// Content
pub mod gallery_image;
pub mod menu_category;
pub mod menu_item;

// Re-exports
pub use admin_user::AdminUserRepository;
pub use courier::CourierRepository;
pub use gallery_image::GalleryImageRepository;
pub use menu_category::MenuCategoryRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for crate::utils::AppError {
    fn from(e: RepoError) -> Self {
        use crate::utils::AppError;
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}
