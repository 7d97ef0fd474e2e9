//! Courier Management Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::CourierRepository;
use crate::utils::{ok_with_message, AppError, AppResponse, AppResult};
use shared::{Courier, CourierCreate, CourierUpdate};

/// List active couriers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Courier>>> {
    let repo = CourierRepository::new(state.db.clone());
    let couriers = repo.find_active().await?;
    Ok(Json(couriers))
}

/// Create a new courier
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CourierCreate>,
) -> AppResult<(StatusCode, Json<Courier>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = CourierRepository::new(state.db.clone());
    let courier = repo.create(payload).await?;
    tracing::info!(courier_id = courier.id, "Courier created");
    Ok((StatusCode::CREATED, Json(courier)))
}

/// Update a courier
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CourierUpdate>,
) -> AppResult<Json<Courier>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = CourierRepository::new(state.db.clone());
    let courier = repo.update(id, payload).await?;
    Ok(Json(courier))
}

/// Delete a courier
pub async fn delete_courier(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = CourierRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("Courier {id} not found")));
    }
    Ok(ok_with_message((), "Courier deleted successfully"))
}
