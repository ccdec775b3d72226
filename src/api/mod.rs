//! API layer - HTTP endpoints over the request pipeline

pub mod categories;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
