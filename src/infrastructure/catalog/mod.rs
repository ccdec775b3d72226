//! Catalog requests, handlers and invalidation rules

mod handlers;
mod requests;
mod rules;

use std::sync::Arc;

pub use handlers::{CategoryHandlers, DashboardHandler, ProductHandlers};
pub use requests::{
    AdjustStock, CreateCategory, CreateProduct, Dashboard, DeleteCategory, DeleteProduct,
    GetCategoryById, GetProductById, ListCategories, ListProducts, LowStockProducts, Page,
    SearchProducts, UpdateCategory, UpdateProduct, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use rules::INVALIDATION_RULES;

use crate::domain::cache::{Cache, TtlPolicy};
use crate::domain::category::CategoryRepository;
use crate::domain::product::ProductRepository;
use crate::infrastructure::pipeline::{Mediator, MediatorBuilder};

/// Registers a handler for every catalog request
pub fn register_handlers(
    builder: MediatorBuilder,
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
) -> MediatorBuilder {
    let product_handlers = Arc::new(ProductHandlers::new(products.clone(), categories.clone()));
    let category_handlers = Arc::new(CategoryHandlers::new(categories.clone(), products.clone()));
    let dashboard = Arc::new(DashboardHandler::new(products, categories));

    builder
        .with_handler::<ListProducts>(product_handlers.clone())
        .with_handler::<GetProductById>(product_handlers.clone())
        .with_handler::<LowStockProducts>(product_handlers.clone())
        .with_handler::<SearchProducts>(product_handlers.clone())
        .with_handler::<CreateProduct>(product_handlers.clone())
        .with_handler::<UpdateProduct>(product_handlers.clone())
        .with_handler::<AdjustStock>(product_handlers.clone())
        .with_handler::<DeleteProduct>(product_handlers)
        .with_handler::<ListCategories>(category_handlers.clone())
        .with_handler::<GetCategoryById>(category_handlers.clone())
        .with_handler::<CreateCategory>(category_handlers.clone())
        .with_handler::<UpdateCategory>(category_handlers.clone())
        .with_handler::<DeleteCategory>(category_handlers)
        .with_handler::<Dashboard>(dashboard)
}

/// Builds the standard pipeline with every catalog handler registered
pub fn build_mediator(
    cache: Arc<dyn Cache>,
    ttl_policy: TtlPolicy,
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
) -> Mediator {
    let rules = Arc::new(INVALIDATION_RULES.clone());
    let builder = Mediator::standard(cache, ttl_policy, rules);

    register_handlers(builder, products, categories).build()
}
