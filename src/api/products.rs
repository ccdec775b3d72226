//! Product endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Json, Query};
use crate::domain::product::Product;
use crate::infrastructure::catalog::{
    AdjustStock, CreateProduct, DeleteProduct, GetProductById, ListProducts, LowStockProducts,
    Page, SearchProducts, UpdateProduct,
};

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(request): Query<ListProducts>,
) -> Result<Json<Page<Product>>, ApiError> {
    debug!(page = request.page, page_size = request.page_size, "Listing products");

    let page = state.mediator.send(request).await?;
    Ok(Json(page))
}

/// GET /api/products/search
pub async fn search_products(
    State(state): State<AppState>,
    Query(request): Query<SearchProducts>,
) -> Result<Json<Page<Product>>, ApiError> {
    debug!(term = %request.term, "Searching products");

    let page = state.mediator.send(request).await?;
    Ok(Json(page))
}

/// GET /api/products/low-stock
pub async fn low_stock_products(
    State(state): State<AppState>,
    Query(request): Query<LowStockProducts>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.mediator.send(request).await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state.mediator.send(GetProductById::new(id)).await?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProduct>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(sku = %request.sku, category_id = %request.category_id, "Creating product");

    let product = state.mediator.send(request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut request): Json<UpdateProduct>,
) -> Result<Json<Product>, ApiError> {
    debug!(product_id = %id, "Updating product");
    request.id = id;

    let product = state.mediator.send(request).await?;
    Ok(Json(product))
}

/// POST /api/products/{id}/stock
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut request): Json<AdjustStock>,
) -> Result<Json<Product>, ApiError> {
    debug!(product_id = %id, delta = request.delta, "Adjusting stock");
    request.id = id;

    let product = state.mediator.send(request).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(product_id = %id, "Deleting product");

    state.mediator.send(DeleteProduct::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
