//! In-memory product repository implementation

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::product::{Product, ProductId, ProductQuery, ProductRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory product store
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with products
    pub fn with_products(products: Vec<Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id().clone(), p)).collect();

        Self {
            products: RwLock::new(map),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<ProductId, Product>>, DomainError> {
        self.products
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<ProductId, Product>>, DomainError> {
        self.products
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, DomainError> {
        Ok(self.read()?.values().find(|p| p.sku() == sku).cloned())
    }

    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        let mut products = self.write()?;

        if products.contains_key(product.id()) {
            return Err(DomainError::conflict(format!(
                "Product '{}' already exists",
                product.id()
            )));
        }

        if products.values().any(|p| p.sku() == product.sku()) {
            return Err(DomainError::conflict(format!(
                "A product with SKU '{}' already exists",
                product.sku()
            )));
        }

        products.insert(product.id().clone(), product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        let mut products = self.write()?;

        if !products.contains_key(product.id()) {
            return Err(DomainError::not_found(format!(
                "Product '{}' not found",
                product.id()
            )));
        }

        products.insert(product.id().clone(), product.clone());
        Ok(product)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, DomainError> {
        Ok(self.write()?.remove(id).is_some())
    }

    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, DomainError> {
        let mut result: Vec<Product> = self
            .read()?
            .values()
            .filter(|p| query.accepts(p))
            .cloned()
            .collect();

        result.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);

        Ok(result.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, query: &ProductQuery) -> Result<usize, DomainError> {
        Ok(self.read()?.values().filter(|p| query.accepts(p)).count())
    }
}
