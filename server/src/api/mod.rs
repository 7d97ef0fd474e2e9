//! API Route Modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - admin authentication
//! - [`orders`] - order intake and back-office order management
//! - [`delivery`] - courier-facing endpoints (login, task list, OTP hand-off)
//! - [`couriers`] - courier account management
//! - [`menu`] - menu categories and items
//! - [`gallery`] - gallery images

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub mod auth;
pub mod couriers;
pub mod delivery;
pub mod gallery;
pub mod health;
pub mod menu;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router.
///
/// The website frontend is served from a different origin during
/// development, hence the permissive CORS policy.
pub fn build_router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(orders::router())
        .merge(delivery::router())
        .merge(couriers::router())
        .merge(menu::router())
        .merge(gallery::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
