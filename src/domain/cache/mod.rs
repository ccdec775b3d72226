//! Cache domain - store abstraction, key derivation, TTL and invalidation rules

mod invalidation;
mod key;
mod repository;
mod ttl;

pub use invalidation::InvalidationMap;
pub use key::{
    derive_key, key_prefix, CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator, KEY_DELIMITER,
};
pub use repository::{Cache, CacheExt};
pub use ttl::{TtlClass, TtlPolicy};

#[cfg(test)]
pub use repository::mock::{CacheOp, MockCache};
