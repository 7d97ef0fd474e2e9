//! Delivery API Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::CourierRepository;
use crate::utils::{ok_with_message, AppError, AppResponse, AppResult};
use shared::{Courier, Order};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub order_id: i64,
    pub otp: String,
}

/// Verify courier credentials.
///
/// Same uniform failure as the admin login: the caller cannot tell a
/// missing account from a wrong password or a deactivated courier.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<Courier>> {
    let repo = CourierRepository::new(state.db.clone());
    let courier = repo
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !courier.is_active {
        return Err(AppError::invalid_credentials());
    }

    let verified = courier
        .verify_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(AppError::invalid_credentials());
    }

    tracing::info!(courier_id = courier.id, "Courier logged in");
    Ok(Json(courier))
}

/// Orders assigned to a courier, newest first
pub async fn orders(
    State(state): State<ServerState>,
    Path(courier_id): Path<i64>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.lifecycle().orders_for_courier(courier_id).await?;
    Ok(Json(orders))
}

/// Complete a delivery by matching the customer's OTP
pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .lifecycle()
        .verify_delivery(payload.order_id, &payload.otp)
        .await?;
    Ok(ok_with_message(order, "Order delivered successfully"))
}
