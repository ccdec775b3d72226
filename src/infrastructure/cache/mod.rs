//! Cache infrastructure - Cache implementations

mod bounded;
mod factory;
mod in_memory;
mod prefix_index;
mod redis;

pub use bounded::BoundedCache;
pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use prefix_index::PrefixIndex;
pub use redis::{RedisCache, RedisCacheConfig};
