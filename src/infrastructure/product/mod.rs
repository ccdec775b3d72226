//! Product infrastructure implementations

mod repository;

pub use repository::InMemoryProductRepository;
