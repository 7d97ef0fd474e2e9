//! Menu API Module
//!
//! Public read endpoints for the website plus back-office CRUD.
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/menu-categories | GET | List categories, by display order |
//! | /api/menu-items | GET | List all items |
//! | /api/menu-items/{category_id} | GET | Items in one category |
//! | /api/admin/menu-categories | POST | Create category |
//! | /api/admin/menu-categories/{id} | PUT/DELETE | Update / delete category |
//! | /api/admin/menu-items | POST | Create item |
//! | /api/admin/menu-items/{id} | PUT/DELETE | Update / delete item |

mod handler;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        // Public reads
        .route("/api/menu-categories", get(handler::list_categories))
        .route("/api/menu-items", get(handler::list_items))
        .route("/api/menu-items/{category_id}", get(handler::items_by_category))
        // Back office
        .route("/api/admin/menu-categories", post(handler::create_category))
        .route(
            "/api/admin/menu-categories/{id}",
            put(handler::update_category).delete(handler::delete_category),
        )
        .route("/api/admin/menu-items", post(handler::create_item))
        .route(
            "/api/admin/menu-items/{id}",
            put(handler::update_item).delete(handler::delete_item),
        )
}
