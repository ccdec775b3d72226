//! Product repository trait

use async_trait::async_trait;

use super::entity::{Product, ProductId};
use crate::domain::category::CategoryId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Query parameters for listing products
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Filter by category
    pub category_id: Option<CategoryId>,
    /// Case-insensitive name or SKU fragment
    pub search: Option<String>,
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Offset for pagination
    pub offset: Option<usize>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether a product passes the category and search filters
    pub fn accepts(&self, product: &Product) -> bool {
        if let Some(ref category_id) = self.category_id {
            if product.category_id() != category_id {
                return false;
            }
        }

        match self.search {
            Some(ref term) => product.matches(term),
            None => true,
        }
    }
}

/// Repository for product persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Get a product by ID
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// Find a product by its SKU
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, DomainError>;

    /// Create a new product; fails with a conflict when the id or SKU is taken
    async fn create(&self, product: Product) -> Result<Product, DomainError>;

    /// Update an existing product
    async fn update(&self, product: Product) -> Result<Product, DomainError>;

    /// Delete a product by ID
    async fn delete(&self, id: &ProductId) -> Result<bool, DomainError>;

    /// List products matching the query, ordered by name
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, DomainError>;

    /// Count products matching the query filters, ignoring pagination
    async fn count(&self, query: &ProductQuery) -> Result<usize, DomainError>;
}
