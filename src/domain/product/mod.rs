//! Product domain

mod entity;
mod repository;

pub use entity::{Product, ProductId};
pub use repository::{ProductQuery, ProductRepository};

#[cfg(test)]
pub use repository::MockProductRepository;
