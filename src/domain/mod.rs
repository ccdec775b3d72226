//! Domain layer - Core business logic and entities

pub mod cache;
pub mod category;
pub mod dashboard;
pub mod error;
pub mod identifier;
pub mod pipeline;
pub mod product;

pub use cache::{
    Cache, CacheExt, CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator, InvalidationMap,
    TtlClass, TtlPolicy,
};
pub use category::{Category, CategoryId, CategoryQuery, CategoryRepository};
pub use dashboard::DashboardMetrics;
pub use error::DomainError;
pub use pipeline::{
    DynRequest, Handler, Next, PipelineBehavior, PipelineResult, Purpose, ReadShape, Request,
    RequestContext, Subject,
};
pub use product::{Product, ProductId, ProductQuery, ProductRepository};
