//! Category domain

mod entity;
mod repository;

pub use entity::{Category, CategoryId};
pub use repository::{CategoryQuery, CategoryRepository};

#[cfg(test)]
pub use repository::MockCategoryRepository;
