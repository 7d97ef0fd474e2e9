//! Order API Module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders | POST | Public order intake |
//! | /api/admin/orders | GET | List orders, newest first |
//! | /api/admin/orders | POST | Manual order entry (phone orders) |
//! | /api/admin/orders/{id} | GET | Order detail |
//! | /api/admin/orders/{id}/status | PUT | Drive the order state machine |
//! | /api/admin/orders/{order_id}/assign/{courier_id} | PUT | Assign courier |
//! | /api/admin/orders/{id} | DELETE | Hard delete |

mod handler;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        // Public intake from the website
        .route("/api/orders", post(handler::place))
        // Back office
        .route("/api/admin/orders", get(handler::list).post(handler::place))
        .route(
            "/api/admin/orders/{id}",
            get(handler::get_by_id).delete(handler::delete_order),
        )
        .route("/api/admin/orders/{id}/status", put(handler::update_status))
        .route(
            "/api/admin/orders/{order_id}/assign/{courier_id}",
            put(handler::assign_courier),
        )
}
