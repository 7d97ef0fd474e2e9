//! Courier Management API Module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/admin/couriers | GET | List active couriers |
//! | /api/admin/couriers | POST | Create a courier |
//! | /api/admin/couriers/{id} | PUT | Update a courier |
//! | /api/admin/couriers/{id} | DELETE | Delete a courier |

mod handler;

use axum::{
    routing::{get, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/admin/couriers",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/admin/couriers/{id}",
            put(handler::update).delete(handler::delete_courier),
        )
}
