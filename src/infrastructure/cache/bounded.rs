//! Time-bounded cache decorator

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Wraps a cache so that no operation blocks longer than `timeout`
///
/// Prefix purges walk every matching key and get their own, usually larger,
/// bound. An elapsed operation surfaces as [`DomainError::Cache`], which the
/// pipeline treats like any other cache failure.
#[derive(Debug, Clone)]
pub struct BoundedCache {
    inner: Arc<dyn Cache>,
    timeout: Duration,
    purge_timeout: Duration,
}

impl BoundedCache {
    pub fn new(inner: Arc<dyn Cache>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            purge_timeout: timeout,
        }
    }

    pub fn with_purge_timeout(mut self, purge_timeout: Duration) -> Self {
        self.purge_timeout = purge_timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn purge_timeout(&self) -> Duration {
        self.purge_timeout
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        Self::within(self.timeout, operation, fut).await
    }

    async fn within<T>(
        limit: Duration,
        operation: &str,
        fut: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(limit, fut).await.map_err(|_| {
            DomainError::cache(format!(
                "Cache {} timed out after {}ms",
                operation,
                limit.as_millis()
            ))
        })?
    }
}

#[async_trait]
impl Cache for BoundedCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.bounded("get", self.inner.get_raw(key)).await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        self.bounded("set", self.inner.set_raw(key, value, ttl)).await
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<usize, DomainError> {
        Self::within(
            self.purge_timeout,
            "delete_prefix",
            self.inner.delete_prefix(prefix),
        )
        .await
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.bounded("clear", self.inner.clear()).await
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.bounded("size", self.inner.size()).await
    }
}
