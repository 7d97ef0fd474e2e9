//! Gallery API Module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/gallery-images | GET | List images, by display order |
//! | /api/admin/gallery-images | POST | Create image |
//! | /api/admin/gallery-images/{id} | PUT/DELETE | Update / delete image |

mod handler;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/gallery-images", get(handler::list))
        .route("/api/admin/gallery-images", post(handler::create))
        .route(
            "/api/admin/gallery-images/{id}",
            put(handler::update).delete(handler::delete_image),
        )
}
