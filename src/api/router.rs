use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::categories;
use super::dashboard;
use super::health;
use super::products;
use super::state::AppState;

/// Catalog routes mounted under `/api`
fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/search", get(products::search_products))
        .route("/products/low-stock", get(products::low_stock_products))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/{id}/stock", post(products::adjust_stock))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
}

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", create_catalog_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;

    async fn app() -> Router {
        let state = crate::create_app_state(&AppConfig::default()).await.unwrap();
        create_router(state)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    async fn seed(app: &Router) {
        let (status, _) = call(
            app,
            Method::POST,
            "/api/categories",
            Some(json!({"id": "c1", "name": "Tools"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(
            app,
            Method::POST,
            "/api/products",
            Some(json!({
                "id": "p1",
                "sku": "HM-01",
                "name": "Hammer",
                "category_id": "c1",
                "quantity": 10,
                "unit_price": 12.5,
                "reorder_level": 3
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app().await, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_probes_cache() {
        let (status, body) = call(&app().await, Method::GET, "/ready", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "cache");
        assert_eq!(body["checks"][0]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_create_and_fetch_product() {
        let app = app().await;
        seed(&app).await;

        let (status, body) = call(&app, Method::GET, "/api/products/p1", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sku"], "HM-01");
        assert_eq!(body["quantity"], 10);
    }

    #[tokio::test]
    async fn test_listing_reflects_writes() {
        let app = app().await;
        seed(&app).await;

        let (_, first) = call(&app, Method::GET, "/api/products?page=1&page_size=10", None).await;
        assert_eq!(first["total"], 1);

        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/products/p1",
            Some(json!({"name": "Claw hammer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, second) = call(&app, Method::GET, "/api/products?page=1&page_size=10", None).await;
        assert_eq!(second["items"][0]["name"], "Claw hammer");
    }

    #[tokio::test]
    async fn test_stock_adjustment_updates_dashboard() {
        let app = app().await;
        seed(&app).await;

        let (_, before) = call(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(before["low_stock_products"], 0);

        let (status, adjusted) = call(
            &app,
            Method::POST,
            "/api/products/p1/stock",
            Some(json!({"delta": -8, "reason": "shipment"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(adjusted["quantity"], 2);

        let (_, after) = call(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(after["low_stock_products"], 1);

        let (_, low) = call(&app, Method::GET, "/api/products/low-stock", None).await;
        assert_eq!(low[0]["id"], "p1");
    }

    #[tokio::test]
    async fn test_search_products() {
        let app = app().await;
        seed(&app).await;

        let (status, body) = call(&app, Method::GET, "/api/products/search?term=hamm", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_delete_product_then_not_found() {
        let app = app().await;
        seed(&app).await;
        call(&app, Method::GET, "/api/products/p1", None).await;

        let (status, body) = call(&app, Method::DELETE, "/api/products/p1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = call(&app, Method::GET, "/api/products/p1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");
    }

    #[tokio::test]
    async fn test_category_with_products_cannot_be_deleted() {
        let app = app().await;
        seed(&app).await;

        let (status, body) = call(&app, Method::DELETE, "/api/categories/c1", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["type"], "conflict_error");
    }

    #[tokio::test]
    async fn test_category_update_visible_in_listing() {
        let app = app().await;
        seed(&app).await;
        call(&app, Method::GET, "/api/categories", None).await;

        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/categories/c1",
            Some(json!({"name": "Hand tools"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, listing) = call(&app, Method::GET, "/api/categories", None).await;
        assert_eq!(listing["items"][0]["name"], "Hand tools");

        let (_, single) = call(&app, Method::GET, "/api/categories/c1", None).await;
        assert_eq!(single["name"], "Hand tools");
    }

    #[tokio::test]
    async fn test_invalid_paging_is_bad_request() {
        let (status, body) = call(&app().await, Method::GET, "/api/products?page=0", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_failed");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/categories")
            .header("content-type", "application/json")
            .body(Body::from("{\"name\":"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_product_in_unknown_category_is_rejected() {
        let (status, body) = call(
            &app().await,
            Method::POST,
            "/api/products",
            Some(json!({"sku": "X-1", "name": "Widget", "category_id": "missing"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }
}
