//! Pipeline infrastructure - behaviors and the mediator that runs them

mod caching;
mod generations;
mod invalidation;
mod mediator;
mod metrics;
mod validation;

pub use caching::CachingBehavior;
pub use generations::PrefixGenerations;
pub use invalidation::InvalidationBehavior;
pub use mediator::{Mediator, MediatorBuilder};
pub use validation::ValidationBehavior;
