//! Shared domain models for the Daily Food House order server.
//!
//! Everything that both the server and any future client crate need to agree
//! on lives here: entity structs, create/update payloads, and the order
//! status state machine. Wire representation is camelCase JSON, matching the
//! shape the storefront consumes.

pub mod models;

pub use models::admin_user::{AdminUser, AdminUserCreate};
pub use models::courier::{Courier, CourierCreate, CourierUpdate};
pub use models::gallery::{GalleryImage, GalleryImageCreate, GalleryImageUpdate};
pub use models::menu::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};
pub use models::order::{Order, OrderDraft, OrderItem, OrderStatus, OrderType};
