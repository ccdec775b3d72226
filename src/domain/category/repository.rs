//! Category repository trait

use async_trait::async_trait;

use super::entity::{Category, CategoryId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Query parameters for listing categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Offset for pagination
    pub offset: Option<usize>,
}

impl CategoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Repository for category persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Get a category by ID
    async fn get(&self, id: &CategoryId) -> Result<Option<Category>, DomainError>;

    /// Create a new category
    async fn create(&self, category: Category) -> Result<Category, DomainError>;

    /// Update an existing category
    async fn update(&self, category: Category) -> Result<Category, DomainError>;

    /// Delete a category by ID
    async fn delete(&self, id: &CategoryId) -> Result<bool, DomainError>;

    /// List categories ordered by name
    async fn list(&self, query: &CategoryQuery) -> Result<Vec<Category>, DomainError>;

    /// Count all categories
    async fn count(&self) -> Result<usize, DomainError>;
}
