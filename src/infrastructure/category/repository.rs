//! In-memory category repository implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::category::{Category, CategoryId, CategoryQuery, CategoryRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory category store
///
/// Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryCategoryRepository {
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with categories
    pub fn with_categories(categories: Vec<Category>) -> Self {
        let map = categories
            .into_iter()
            .map(|c| (c.id().clone(), c))
            .collect();

        Self {
            categories: RwLock::new(map),
        }
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<CategoryId, Category>>, DomainError> {
        self.categories
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<CategoryId, Category>>, DomainError> {
        self.categories
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn get(&self, id: &CategoryId) -> Result<Option<Category>, DomainError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn create(&self, category: Category) -> Result<Category, DomainError> {
        let mut categories = self.write()?;

        if categories.contains_key(category.id()) {
            return Err(DomainError::conflict(format!(
                "Category '{}' already exists",
                category.id()
            )));
        }

        categories.insert(category.id().clone(), category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, DomainError> {
        let mut categories = self.write()?;

        if !categories.contains_key(category.id()) {
            return Err(DomainError::not_found(format!(
                "Category '{}' not found",
                category.id()
            )));
        }

        categories.insert(category.id().clone(), category.clone());
        Ok(category)
    }

    async fn delete(&self, id: &CategoryId) -> Result<bool, DomainError> {
        Ok(self.write()?.remove(id).is_some())
    }

    async fn list(&self, query: &CategoryQuery) -> Result<Vec<Category>, DomainError> {
        let mut result: Vec<Category> = self.read()?.values().cloned().collect();

        // Name, then id, keeps pages stable for equal names
        result.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);

        Ok(result.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category::new(CategoryId::new(id).unwrap(), name)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryCategoryRepository::new();

        repo.create(category("c1", "Electronics")).await.unwrap();

        let found = repo.get(&CategoryId::new("c1").unwrap()).await.unwrap();
        assert_eq!(found.unwrap().name(), "Electronics");
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let repo = InMemoryCategoryRepository::with_categories(vec![category("c1", "Electronics")]);

        let result = repo.create(category("c1", "Garden")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repo = InMemoryCategoryRepository::new();

        let result = repo.update(category("c1", "Electronics")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryCategoryRepository::with_categories(vec![category("c1", "Electronics")]);
        let id = CategoryId::new("c1").unwrap();

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_sorted_and_paginated() {
        let repo = InMemoryCategoryRepository::with_categories(vec![
            category("c3", "Toys"),
            category("c1", "Electronics"),
            category("c2", "Garden"),
        ]);

        let all = repo.list(&CategoryQuery::new()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Electronics", "Garden", "Toys"]);

        let page = repo
            .list(&CategoryQuery::new().with_offset(1).with_limit(1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name(), "Garden");

        let past_end = repo
            .list(&CategoryQuery::new().with_offset(10))
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }
}
