//! Gallery API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::GalleryImageRepository;
use crate::utils::{ok_with_message, AppError, AppResponse, AppResult};
use shared::{GalleryImage, GalleryImageCreate, GalleryImageUpdate};

/// List gallery images by display order
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<GalleryImage>>> {
    let repo = GalleryImageRepository::new(state.db.clone());
    let images = repo.find_all().await?;
    Ok(Json(images))
}

/// Create a gallery image
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GalleryImageCreate>,
) -> AppResult<(StatusCode, Json<GalleryImage>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = GalleryImageRepository::new(state.db.clone());
    let image = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// Update a gallery image
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<GalleryImageUpdate>,
) -> AppResult<Json<GalleryImage>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = GalleryImageRepository::new(state.db.clone());
    let image = repo
        .update(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gallery image {id} not found")))?;
    Ok(Json(image))
}

/// Delete a gallery image
pub async fn delete_image(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = GalleryImageRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("Gallery image {id} not found")));
    }
    Ok(ok_with_message((), "Gallery image deleted successfully"))
}
