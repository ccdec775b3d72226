//! Catalog requests
//!
//! Field order is significant: read requests derive their cache key from
//! their fields in declaration order.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::category::Category;
use crate::domain::dashboard::DashboardMetrics;
use crate::domain::pipeline::{Purpose, ReadShape, Request, Subject};
use crate::domain::product::Product;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, page: u32, page_size: u32) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
        }
    }
}

/// Offset of the first item of a 1-based page
pub(crate) fn page_offset(page: u32, page_size: u32) -> usize {
    page.saturating_sub(1) as usize * page_size as usize
}

// Reads

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListProducts {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u32,
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub category_id: Option<String>,
}

impl Default for ListProducts {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            category_id: None,
        }
    }
}

impl Request for ListProducts {
    type Response = Page<Product>;
    const NAME: &'static str = "ListProducts";
    const PURPOSE: Purpose = Purpose::Read(ReadShape::collection());
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GetProductById {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
}

impl GetProductById {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Request for GetProductById {
    type Response = Product;
    const NAME: &'static str = "GetProductById";
    const PURPOSE: Purpose = Purpose::Read(ReadShape::single_item());
}

/// Products at or below a stock threshold, or their own reorder level
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LowStockProducts {
    #[serde(default)]
    pub threshold: Option<u32>,
}

impl Request for LowStockProducts {
    type Response = Vec<Product>;
    const NAME: &'static str = "LowStockProducts";
    const PURPOSE: Purpose = Purpose::Read(ReadShape::collection());
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchProducts {
    #[validate(length(min = 1, max = 100))]
    pub term: String,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u32,
}

impl SearchProducts {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl Request for SearchProducts {
    type Response = Page<Product>;
    const NAME: &'static str = "SearchProducts";
    const PURPOSE: Purpose = Purpose::Read(ReadShape::collection());
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListCategories {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u32,
}

impl Default for ListCategories {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl Request for ListCategories {
    type Response = Page<Category>;
    const NAME: &'static str = "ListCategories";
    const PURPOSE: Purpose = Purpose::Read(ReadShape::collection());
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GetCategoryById {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
}

impl GetCategoryById {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Request for GetCategoryById {
    type Response = Category;
    const NAME: &'static str = "GetCategoryById";
    const PURPOSE: Purpose = Purpose::Read(ReadShape::single_item());
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Dashboard {
    #[serde(default)]
    pub low_stock_threshold: Option<u32>,
}

impl Request for Dashboard {
    type Response = DashboardMetrics;
    const NAME: &'static str = "Dashboard";
    const PURPOSE: Purpose = Purpose::Read(ReadShape::dashboard());
}

// Writes

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    /// Generated when absent
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub category_id: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    #[serde(default)]
    pub reorder_level: u32,
}

impl Request for CreateProduct {
    type Response = Product;
    const NAME: &'static str = "CreateProduct";
    const PURPOSE: Purpose = Purpose::Write(Subject::Product);
}

/// Partial product update; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProduct {
    #[serde(skip_deserializing)]
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub category_id: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub reorder_level: Option<u32>,
}

impl Request for UpdateProduct {
    type Response = Product;
    const NAME: &'static str = "UpdateProduct";
    const PURPOSE: Purpose = Purpose::Write(Subject::Product);
}

/// Signed stock movement: positive receives stock, negative ships it
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdjustStock {
    #[serde(skip_deserializing)]
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    pub delta: i64,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub reason: Option<String>,
}

impl Request for AdjustStock {
    type Response = Product;
    const NAME: &'static str = "AdjustStock";
    const PURPOSE: Purpose = Purpose::Write(Subject::Product);
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteProduct {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
}

impl DeleteProduct {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Request for DeleteProduct {
    type Response = ();
    const NAME: &'static str = "DeleteProduct";
    const PURPOSE: Purpose = Purpose::Write(Subject::Product);
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategory {
    /// Generated when absent
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl CreateCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl Request for CreateCategory {
    type Response = Category;
    const NAME: &'static str = "CreateCategory";
    const PURPOSE: Purpose = Purpose::Write(Subject::Category);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCategory {
    #[serde(skip_deserializing)]
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl Request for UpdateCategory {
    type Response = Category;
    const NAME: &'static str = "UpdateCategory";
    const PURPOSE: Purpose = Purpose::Write(Subject::Category);
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteCategory {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
}

impl DeleteCategory {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Request for DeleteCategory {
    type Response = ();
    const NAME: &'static str = "DeleteCategory";
    const PURPOSE: Purpose = Purpose::Write(Subject::Category);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::cache::{derive_key, TtlClass, TtlPolicy};
    use crate::domain::pipeline::DynRequest;

    fn key_of(request: &dyn DynRequest) -> String {
        derive_key(request.name(), &request.fields().unwrap())
    }

    #[test]
    fn test_list_keys_follow_field_order() {
        let request = ListProducts {
            page: 2,
            page_size: 50,
            category_id: Some("c1".to_string()),
        };

        assert_eq!(
            key_of(&request),
            "ListProducts:page:2:page_size:50:category_id:c1"
        );
        assert_eq!(
            key_of(&ListProducts::default()),
            "ListProducts:page:1:page_size:20:category_id:"
        );
    }

    #[test]
    fn test_fieldless_read_keys() {
        assert_eq!(key_of(&Dashboard::default()), "Dashboard:low_stock_threshold:");
        assert_eq!(key_of(&GetCategoryById::new("c1")), "GetCategoryById:id:c1");
    }

    #[test]
    fn test_read_ttls() {
        let policy = TtlPolicy::default();

        assert_eq!(policy.resolve(&Dashboard::PURPOSE), Duration::from_secs(60));
        assert_eq!(policy.resolve(&ListCategories::PURPOSE), Duration::from_secs(120));
        assert_eq!(policy.resolve(&SearchProducts::PURPOSE), Duration::from_secs(120));
        assert_eq!(policy.resolve(&GetProductById::PURPOSE), Duration::from_secs(300));
        assert_eq!(TtlClass::classify(&LowStockProducts::PURPOSE), TtlClass::ListQuery);
    }

    #[test]
    fn test_write_purposes() {
        assert_eq!(CreateProduct::PURPOSE, Purpose::Write(Subject::Product));
        assert_eq!(AdjustStock::PURPOSE, Purpose::Write(Subject::Product));
        assert_eq!(DeleteCategory::PURPOSE, Purpose::Write(Subject::Category));
    }

    #[test]
    fn test_query_defaults() {
        let request: ListCategories = serde_json::from_str("{}").unwrap();

        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_validation_rules() {
        let too_big = ListCategories {
            page: 1,
            page_size: MAX_PAGE_SIZE + 1,
        };
        assert!(too_big.validate().is_err());

        let blank = CreateCategory::new("");
        assert!(blank.validate().is_err());

        let negative_price = CreateProduct {
            id: None,
            sku: "KB-01".to_string(),
            name: "Keyboard".to_string(),
            category_id: "c1".to_string(),
            quantity: 1,
            unit_price: -1.0,
            reorder_level: 0,
        };
        assert!(negative_price.validate().is_err());
    }

    #[test]
    fn test_path_ids_are_not_read_from_bodies() {
        let update: UpdateProduct =
            serde_json::from_str(r#"{"id":"p9","name":"Mouse"}"#).unwrap();

        assert!(update.id.is_empty());
        assert_eq!(update.name.as_deref(), Some("Mouse"));
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }
}
