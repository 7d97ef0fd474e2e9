//! Order API Handlers
//!
//! Thin adapters over [`OrderLifecycle`]; all business rules live there.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{ok_with_message, AppError, AppResponse, AppResult};
use shared::{Order, OrderDraft, OrderStatus};

/// Public order intake
pub async fn place(
    State(state): State<ServerState>,
    Json(draft): Json<OrderDraft>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.lifecycle().create_order(draft).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List all orders, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.lifecycle().list_orders().await?;
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle().get_order(id).await?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// Move an order through its lifecycle.
///
/// Confirmation issues the OTP and fires the customer notification.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle().update_status(id, payload.status).await?;
    Ok(Json(order))
}

/// Assign a courier to an order
pub async fn assign_courier(
    State(state): State<ServerState>,
    Path((order_id, courier_id)): Path<(i64, i64)>,
) -> AppResult<Json<Order>> {
    let order = state
        .lifecycle()
        .assign_courier(order_id, courier_id)
        .await?;
    Ok(Json(order))
}

/// Hard delete an order
pub async fn delete_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let deleted = state.lifecycle().delete_order(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Order {id} not found")));
    }
    Ok(ok_with_message((), "Order deleted successfully"))
}
