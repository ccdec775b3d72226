//! Product entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryId;
use crate::domain::identifier::validate_identifier;
use crate::domain::DomainError;

/// Product identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ProductId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        validate_identifier("Product", &id)?;
        Ok(Self(id))
    }

    /// Generate a new product ID with UUID
    pub fn generate() -> Self {
        Self(format!("prd-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stocked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    category_id: CategoryId,
    quantity: u32,
    unit_price: f64,
    reorder_level: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        category_id: CategoryId,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            category_id,
            quantity: 0,
            unit_price: 0.0,
            reorder_level: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn with_reorder_level(mut self, reorder_level: u32) -> Self {
        self.reorder_level = reorder_level;
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn reorder_level(&self) -> u32 {
        self.reorder_level
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Stock value at the current unit price
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    /// At or below `threshold`, or the product's own reorder level when none is given
    pub fn is_low_stock(&self, threshold: Option<u32>) -> bool {
        self.quantity <= threshold.unwrap_or(self.reorder_level)
    }

    /// Case-insensitive match on name or SKU
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.sku.to_lowercase().contains(&term)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_category(&mut self, category_id: CategoryId) {
        self.category_id = category_id;
        self.touch();
    }

    pub fn set_unit_price(&mut self, unit_price: f64) {
        self.unit_price = unit_price;
        self.touch();
    }

    pub fn set_reorder_level(&mut self, reorder_level: u32) {
        self.reorder_level = reorder_level;
        self.touch();
    }

    /// Applies a signed stock movement; stock never goes negative
    pub fn adjust_stock(&mut self, delta: i64) -> Result<(), DomainError> {
        let overflow =
            || DomainError::validation(format!("Stock for product '{}' would overflow", self.id));

        let updated = i64::from(self.quantity)
            .checked_add(delta)
            .ok_or_else(overflow)?;

        if updated < 0 {
            return Err(DomainError::validation(format!(
                "Insufficient stock for product '{}': have {}, requested {}",
                self.id,
                self.quantity,
                delta.unsigned_abs()
            )));
        }

        self.quantity = u32::try_from(updated).map_err(|_| overflow())?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
