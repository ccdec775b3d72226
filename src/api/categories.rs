//! Category endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Json, Query};
use crate::domain::category::Category;
use crate::infrastructure::catalog::{
    CreateCategory, DeleteCategory, GetCategoryById, ListCategories, Page, UpdateCategory,
};

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(request): Query<ListCategories>,
) -> Result<Json<Page<Category>>, ApiError> {
    let page = state.mediator.send(request).await?;
    Ok(Json(page))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category = state.mediator.send(GetCategoryById::new(id)).await?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategory>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(name = %request.name, "Creating category");

    let category = state.mediator.send(request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut request): Json<UpdateCategory>,
) -> Result<Json<Category>, ApiError> {
    debug!(category_id = %id, "Updating category");
    request.id = id;

    let category = state.mediator.send(request).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(category_id = %id, "Deleting category");

    state.mediator.send(DeleteCategory::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
