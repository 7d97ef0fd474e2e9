//! Delivery API Module
//!
//! Courier-facing endpoints: login, assigned task list and the OTP
//! hand-off that completes a delivery.
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/delivery/login | POST | Courier credential check |
//! | /api/delivery/orders/{courier_id} | GET | Orders assigned to a courier |
//! | /api/delivery/verify-otp | POST | Complete a delivery against the OTP |

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/delivery/login", post(handler::login))
        .route("/api/delivery/orders/{courier_id}", get(handler::orders))
        .route("/api/delivery/verify-otp", post(handler::verify_otp))
}
