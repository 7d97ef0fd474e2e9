//! Menu API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{MenuCategoryRepository, MenuItemRepository};
use crate::utils::{ok_with_message, AppError, AppResponse, AppResult};
use shared::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};

// ========== Categories ==========

/// List categories by display order
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<MenuCategory>>> {
    let repo = MenuCategoryRepository::new(state.db.clone());
    let categories = repo.find_all().await?;
    Ok(Json(categories))
}

/// Create a category
pub async fn create_category(
    State(state): State<ServerState>,
    Json(payload): Json<MenuCategoryCreate>,
) -> AppResult<(StatusCode, Json<MenuCategory>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = MenuCategoryRepository::new(state.db.clone());
    let category = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category
pub async fn update_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuCategoryUpdate>,
) -> AppResult<Json<MenuCategory>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = MenuCategoryRepository::new(state.db.clone());
    let category = repo
        .update(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu category {id} not found")))?;
    Ok(Json(category))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = MenuCategoryRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("Menu category {id} not found")));
    }
    Ok(ok_with_message((), "Menu category deleted successfully"))
}

// ========== Items ==========

/// List all menu items
pub async fn list_items(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

/// List menu items in one category
pub async fn items_by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo.find_by_category(category_id).await?;
    Ok(Json(items))
}

/// Create a menu item
pub async fn create_item(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let categories = MenuCategoryRepository::new(state.db.clone());
    if categories.find_by_id(payload.category_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Menu category {} does not exist",
            payload.category_id
        )));
    }

    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update a menu item
pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(category_id) = payload.category_id {
        let categories = MenuCategoryRepository::new(state.db.clone());
        if categories.find_by_id(category_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Menu category {category_id} does not exist"
            )));
        }
    }

    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .update(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu item {id} not found")))?;
    Ok(Json(item))
}

/// Delete a menu item
pub async fn delete_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("Menu item {id} not found")));
    }
    Ok(ok_with_message((), "Menu item deleted successfully"))
}
