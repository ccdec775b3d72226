//! Catalog request handlers

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::requests::{
    page_offset, AdjustStock, CreateCategory, CreateProduct, Dashboard, DeleteCategory,
    DeleteProduct, GetCategoryById, GetProductById, ListCategories, ListProducts,
    LowStockProducts, Page, SearchProducts, UpdateCategory, UpdateProduct,
};
use crate::domain::category::{Category, CategoryId, CategoryQuery, CategoryRepository};
use crate::domain::dashboard::DashboardMetrics;
use crate::domain::pipeline::Handler;
use crate::domain::product::{Product, ProductId, ProductQuery, ProductRepository};
use crate::domain::DomainError;

async fn require_category(
    categories: &dyn CategoryRepository,
    id: &CategoryId,
) -> Result<(), DomainError> {
    match categories.get(id).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::validation(format!(
            "Category '{}' does not exist",
            id
        ))),
    }
}

/// Handles product reads and writes
#[derive(Clone)]
pub struct ProductHandlers {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl std::fmt::Debug for ProductHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductHandlers").finish_non_exhaustive()
    }
}

impl ProductHandlers {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            products,
            categories,
        }
    }

    async fn load(&self, id: &str) -> Result<Product, DomainError> {
        let id = ProductId::new(id)?;

        self.products
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Product '{}' not found", id)))
    }

    async fn page(
        &self,
        query: ProductQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Product>, DomainError> {
        let total = self.products.count(&query).await?;
        let query = query
            .with_offset(page_offset(page, page_size))
            .with_limit(page_size as usize);
        let items = self.products.list(&query).await?;

        Ok(Page::new(items, total, page, page_size))
    }
}

#[async_trait]
impl Handler<ListProducts> for ProductHandlers {
    async fn handle(&self, request: &ListProducts) -> Result<Page<Product>, DomainError> {
        let mut query = ProductQuery::new();

        if let Some(ref category_id) = request.category_id {
            query = query.with_category(CategoryId::new(category_id.as_str())?);
        }

        self.page(query, request.page, request.page_size).await
    }
}

#[async_trait]
impl Handler<GetProductById> for ProductHandlers {
    async fn handle(&self, request: &GetProductById) -> Result<Product, DomainError> {
        self.load(&request.id).await
    }
}

#[async_trait]
impl Handler<LowStockProducts> for ProductHandlers {
    async fn handle(&self, request: &LowStockProducts) -> Result<Vec<Product>, DomainError> {
        let mut low: Vec<Product> = self
            .products
            .list(&ProductQuery::new())
            .await?
            .into_iter()
            .filter(|p| p.is_low_stock(request.threshold))
            .collect();

        low.sort_by_key(|p| p.quantity());
        Ok(low)
    }
}

#[async_trait]
impl Handler<SearchProducts> for ProductHandlers {
    async fn handle(&self, request: &SearchProducts) -> Result<Page<Product>, DomainError> {
        let query = ProductQuery::new().with_search(request.term.trim());
        self.page(query, request.page, request.page_size).await
    }
}

#[async_trait]
impl Handler<CreateProduct> for ProductHandlers {
    async fn handle(&self, request: &CreateProduct) -> Result<Product, DomainError> {
        let id = match request.id {
            Some(ref id) => ProductId::new(id.as_str())?,
            None => ProductId::generate(),
        };
        let category_id = CategoryId::new(request.category_id.as_str())?;

        if self.products.find_by_sku(&request.sku).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "A product with SKU '{}' already exists",
                request.sku
            )));
        }

        require_category(self.categories.as_ref(), &category_id).await?;

        let product = Product::new(id, &request.sku, &request.name, category_id)
            .with_quantity(request.quantity)
            .with_unit_price(request.unit_price)
            .with_reorder_level(request.reorder_level);

        let created = self.products.create(product).await?;
        info!(product_id = %created.id(), sku = created.sku(), "Created product");

        Ok(created)
    }
}

#[async_trait]
impl Handler<UpdateProduct> for ProductHandlers {
    async fn handle(&self, request: &UpdateProduct) -> Result<Product, DomainError> {
        let mut product = self.load(&request.id).await?;

        if let Some(ref category_id) = request.category_id {
            let category_id = CategoryId::new(category_id.as_str())?;
            require_category(self.categories.as_ref(), &category_id).await?;
            product.set_category(category_id);
        }

        if let Some(ref name) = request.name {
            product.set_name(name.as_str());
        }

        if let Some(unit_price) = request.unit_price {
            product.set_unit_price(unit_price);
        }

        if let Some(reorder_level) = request.reorder_level {
            product.set_reorder_level(reorder_level);
        }

        self.products.update(product).await
    }
}

#[async_trait]
impl Handler<AdjustStock> for ProductHandlers {
    async fn handle(&self, request: &AdjustStock) -> Result<Product, DomainError> {
        if request.delta == 0 {
            return Err(DomainError::validation("delta: must not be zero"));
        }

        let mut product = self.load(&request.id).await?;
        product.adjust_stock(request.delta)?;

        let updated = self.products.update(product).await?;
        info!(
            product_id = %updated.id(),
            delta = request.delta,
            quantity = updated.quantity(),
            reason = request.reason.as_deref().unwrap_or(""),
            "Adjusted stock"
        );

        Ok(updated)
    }
}

#[async_trait]
impl Handler<DeleteProduct> for ProductHandlers {
    async fn handle(&self, request: &DeleteProduct) -> Result<(), DomainError> {
        let id = ProductId::new(request.id.as_str())?;

        if !self.products.delete(&id).await? {
            return Err(DomainError::not_found(format!("Product '{}' not found", id)));
        }

        info!(product_id = %id, "Deleted product");
        Ok(())
    }
}

/// Handles category reads and writes
#[derive(Clone)]
pub struct CategoryHandlers {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
}

impl std::fmt::Debug for CategoryHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryHandlers").finish_non_exhaustive()
    }
}

impl CategoryHandlers {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            categories,
            products,
        }
    }

    async fn load(&self, id: &str) -> Result<Category, DomainError> {
        let id = CategoryId::new(id)?;

        self.categories
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Category '{}' not found", id)))
    }
}

#[async_trait]
impl Handler<ListCategories> for CategoryHandlers {
    async fn handle(&self, request: &ListCategories) -> Result<Page<Category>, DomainError> {
        let total = self.categories.count().await?;
        let query = CategoryQuery::new()
            .with_offset(page_offset(request.page, request.page_size))
            .with_limit(request.page_size as usize);
        let items = self.categories.list(&query).await?;

        Ok(Page::new(items, total, request.page, request.page_size))
    }
}

#[async_trait]
impl Handler<GetCategoryById> for CategoryHandlers {
    async fn handle(&self, request: &GetCategoryById) -> Result<Category, DomainError> {
        self.load(&request.id).await
    }
}

#[async_trait]
impl Handler<CreateCategory> for CategoryHandlers {
    async fn handle(&self, request: &CreateCategory) -> Result<Category, DomainError> {
        let id = match request.id {
            Some(ref id) => CategoryId::new(id.as_str())?,
            None => CategoryId::generate(),
        };

        let category =
            Category::new(id, request.name.as_str()).with_description(request.description.clone());

        let created = self.categories.create(category).await?;
        info!(category_id = %created.id(), name = created.name(), "Created category");

        Ok(created)
    }
}

#[async_trait]
impl Handler<UpdateCategory> for CategoryHandlers {
    async fn handle(&self, request: &UpdateCategory) -> Result<Category, DomainError> {
        let mut category = self.load(&request.id).await?;

        if let Some(ref name) = request.name {
            category.set_name(name.as_str());
        }

        if request.description.is_some() {
            category.set_description(request.description.clone());
        }

        self.categories.update(category).await
    }
}

#[async_trait]
impl Handler<DeleteCategory> for CategoryHandlers {
    async fn handle(&self, request: &DeleteCategory) -> Result<(), DomainError> {
        let id = CategoryId::new(request.id.as_str())?;

        let in_use = self
            .products
            .count(&ProductQuery::new().with_category(id.clone()))
            .await?;

        if in_use > 0 {
            return Err(DomainError::conflict(format!(
                "Category '{}' still holds {} product(s)",
                id, in_use
            )));
        }

        if !self.categories.delete(&id).await? {
            return Err(DomainError::not_found(format!("Category '{}' not found", id)));
        }

        info!(category_id = %id, "Deleted category");
        Ok(())
    }
}

/// Builds the inventory dashboard
#[derive(Clone)]
pub struct DashboardHandler {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl std::fmt::Debug for DashboardHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardHandler").finish_non_exhaustive()
    }
}

impl DashboardHandler {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            products,
            categories,
        }
    }
}

#[async_trait]
impl Handler<Dashboard> for DashboardHandler {
    async fn handle(&self, request: &Dashboard) -> Result<DashboardMetrics, DomainError> {
        let products = self.products.list(&ProductQuery::new()).await?;
        let total_categories = self.categories.count().await?;

        Ok(DashboardMetrics::compute(
            &products,
            total_categories,
            request.low_stock_threshold,
        ))
    }
}
