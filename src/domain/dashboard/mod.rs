//! Dashboard metrics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Inventory summary shown on the back-office dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_products: usize,
    pub total_categories: usize,
    pub low_stock_products: usize,
    pub total_units: u64,
    pub inventory_value: f64,
    pub generated_at: DateTime<Utc>,
}

impl DashboardMetrics {
    /// Summarizes products; `low_stock_threshold` overrides per-product reorder levels
    pub fn compute(
        products: &[Product],
        total_categories: usize,
        low_stock_threshold: Option<u32>,
    ) -> Self {
        Self {
            total_products: products.len(),
            total_categories,
            low_stock_products: products
                .iter()
                .filter(|p| p.is_low_stock(low_stock_threshold))
                .count(),
            total_units: products.iter().map(|p| p.quantity() as u64).sum(),
            inventory_value: products.iter().map(Product::stock_value).sum(),
            generated_at: Utc::now(),
        }
    }
}
