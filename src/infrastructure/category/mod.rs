//! Category infrastructure implementations

mod repository;

pub use repository::InMemoryCategoryRepository;
