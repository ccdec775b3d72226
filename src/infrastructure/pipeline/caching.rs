//! Read-through caching behavior

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::generations::PrefixGenerations;
use super::metrics;
use crate::domain::cache::{key_prefix, Cache, TtlPolicy};
use crate::domain::pipeline::{Next, PipelineBehavior, PipelineResult, Purpose, RequestContext};

/// Serves read requests from the cache, populating it on a miss
///
/// The cache never decides the outcome of a request: a failed lookup is a
/// miss and a failed store is dropped, both logged at warn level.
///
/// A response is only kept if no invalidation of its prefix started while
/// the handler ran or while the entry was being written.
#[derive(Debug, Clone)]
pub struct CachingBehavior {
    cache: Arc<dyn Cache>,
    ttl_policy: TtlPolicy,
    generations: Arc<PrefixGenerations>,
}

impl CachingBehavior {
    pub fn new(
        cache: Arc<dyn Cache>,
        ttl_policy: TtlPolicy,
        generations: Arc<PrefixGenerations>,
    ) -> Self {
        Self {
            cache,
            ttl_policy,
            generations,
        }
    }

    async fn lookup(&self, request: &'static str, key: &str) -> Option<Value> {
        let raw = match self.cache.get_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(request, key, error = %e, "Cache lookup failed, calling handler");
                metrics::record_cache_error("get");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(request, key, error = %e, "Discarding unreadable cached response");
                metrics::record_cache_error("decode");
                None
            }
        }
    }

    async fn store(&self, request: &'static str, key: &str, purpose: &Purpose, response: &Value) {
        let ttl = self.ttl_policy.resolve(purpose);

        let result = match serde_json::to_string(response) {
            Ok(raw) => self.cache.set_raw(key, &raw, ttl).await,
            Err(e) => {
                warn!(request, key, error = %e, "Failed to encode response for caching");
                return;
            }
        };

        match result {
            Ok(()) => debug!(request, key, ttl_secs = ttl.as_secs(), "Cached response"),
            Err(e) => {
                warn!(request, key, error = %e, "Failed to cache response");
                metrics::record_cache_error("set");
            }
        }
    }

    async fn evict(&self, request: &'static str, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            warn!(request, key, error = %e, "Failed to evict response stored during invalidation");
            metrics::record_cache_error("delete");
        }
    }
}

#[async_trait]
impl PipelineBehavior for CachingBehavior {
    fn name(&self) -> &'static str {
        "caching"
    }

    async fn handle(&self, ctx: &RequestContext<'_>, next: Next<'_>) -> PipelineResult {
        let purpose = ctx.purpose();
        if !purpose.is_read() {
            return next.run(ctx).await;
        }

        let request = ctx.name();
        let key = match ctx.cache_key() {
            Ok(key) => key,
            Err(e) => {
                warn!(request, error = %e, "Cannot derive cache key, bypassing cache");
                return next.run(ctx).await;
            }
        };

        if let Some(cached) = self.lookup(request, &key).await {
            debug!(request, key = %key, "Cache hit");
            metrics::record_cache_hit(request);
            return Ok(cached);
        }

        debug!(request, key = %key, "Cache miss");
        metrics::record_cache_miss(request);

        let prefix = key_prefix(request);
        let generation = self.generations.current(&prefix);

        let response = next.run(ctx).await?;

        if self.generations.current(&prefix) != generation {
            debug!(request, key = %key, "Prefix invalidated during handling, not caching");
            return Ok(response);
        }

        self.store(request, &key, &purpose, &response).await;

        if self.generations.current(&prefix) != generation {
            debug!(request, key = %key, "Prefix invalidated during store, evicting");
            self.evict(request, &key).await;
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::FutureExt;
    use serde::Serialize;
    use serde_json::json;
    use validator::Validate;

    use super::*;
    use crate::domain::cache::{CacheOp, MockCache};
    use crate::domain::pipeline::{ReadShape, Request, Subject};
    use crate::domain::DomainError;

    #[derive(Serialize, Validate)]
    struct FindShelf {
        id: String,
    }

    impl Request for FindShelf {
        type Response = Value;
        const NAME: &'static str = "FindShelf";
        const PURPOSE: Purpose = Purpose::Read(ReadShape::single_item());
    }

    #[derive(Serialize, Validate)]
    struct MoveShelf {
        id: String,
    }

    impl Request for MoveShelf {
        type Response = Value;
        const NAME: &'static str = "MoveShelf";
        const PURPOSE: Purpose = Purpose::Write(Subject::Product);
    }

    async fn dispatch(
        cache: Arc<MockCache>,
        request: &dyn crate::domain::pipeline::DynRequest,
        calls: Arc<AtomicUsize>,
    ) -> PipelineResult {
        let behaviors: Vec<Arc<dyn PipelineBehavior>> = vec![Arc::new(CachingBehavior::new(
            cache,
            TtlPolicy::default(),
            Arc::new(PrefixGenerations::new()),
        ))];
        let terminal = move || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok::<_, DomainError>(json!({ "call": n }))
            }
            .boxed()
        };

        let ctx = RequestContext::new(request);
        Next::new(&behaviors, &terminal).run(&ctx).await
    }

    fn shelf(id: &str) -> FindShelf {
        FindShelf { id: id.to_string() }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = Arc::new(MockCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let first = dispatch(cache.clone(), &shelf("s1"), calls.clone()).await.unwrap();
        let second = dispatch(cache.clone(), &shelf("s1"), calls.clone()).await.unwrap();

        assert_eq!(first, json!({ "call": 1 }));
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.ttl_of("FindShelf:id:s1"),
            Some(Duration::from_secs(300))
        );
    }

    #[tokio::test]
    async fn test_distinct_fields_use_distinct_entries() {
        let cache = Arc::new(MockCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        dispatch(cache.clone(), &shelf("s1"), calls.clone()).await.unwrap();
        dispatch(cache.clone(), &shelf("s2"), calls.clone()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.keys(), vec!["FindShelf:id:s1", "FindShelf:id:s2"]);
    }

    #[tokio::test]
    async fn test_get_failure_falls_through_to_handler() {
        let cache = Arc::new(MockCache::new().failing(CacheOp::Get));
        let calls = Arc::new(AtomicUsize::new(0));

        let response = dispatch(cache.clone(), &shelf("s1"), calls.clone()).await.unwrap();

        assert_eq!(response, json!({ "call": 1 }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.set_calls(), 1);
    }

    #[tokio::test]
    async fn test_set_failure_still_returns_response() {
        let cache = Arc::new(MockCache::new().failing(CacheOp::Set));
        let calls = Arc::new(AtomicUsize::new(0));

        let response = dispatch(cache.clone(), &shelf("s1"), calls.clone()).await.unwrap();

        assert_eq!(response, json!({ "call": 1 }));
        assert!(cache.keys().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let cache = Arc::new(MockCache::new());
        cache
            .set_raw("FindShelf:id:s1", "{not json", Duration::from_secs(60))
            .await
            .unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let response = dispatch(cache.clone(), &shelf("s1"), calls.clone()).await.unwrap();

        assert_eq!(response, json!({ "call": 1 }));
        assert_eq!(
            cache.get_raw("FindShelf:id:s1").await.unwrap().as_deref(),
            Some("{\"call\":1}")
        );
    }

    #[tokio::test]
    async fn test_writes_bypass_cache() {
        let cache = Arc::new(MockCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let request = MoveShelf {
            id: "s1".to_string(),
        };

        dispatch(cache.clone(), &request, calls.clone()).await.unwrap();
        dispatch(cache.clone(), &request, calls.clone()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get_calls(), 0);
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_handler_error_is_not_cached() {
        let cache = Arc::new(MockCache::new());
        let behaviors: Vec<Arc<dyn PipelineBehavior>> = vec![Arc::new(CachingBehavior::new(
            cache.clone(),
            TtlPolicy::default(),
            Arc::new(PrefixGenerations::new()),
        ))];
        let terminal =
            || async { Err::<Value, _>(DomainError::not_found("Shelf 's1' not found")) }.boxed();

        let request = shelf("s1");
        let ctx = RequestContext::new(&request);
        let err = Next::new(&behaviors, &terminal).run(&ctx).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalidation_during_handler_skips_store() {
        let cache = Arc::new(MockCache::new());
        let generations = Arc::new(PrefixGenerations::new());
        let behaviors: Vec<Arc<dyn PipelineBehavior>> = vec![Arc::new(CachingBehavior::new(
            cache.clone(),
            TtlPolicy::default(),
            generations.clone(),
        ))];

        let racing = generations.clone();
        let terminal = move || {
            racing.advance("FindShelf:");
            async { Ok::<_, DomainError>(json!({ "stale": true })) }.boxed()
        };

        let request = shelf("s1");
        let ctx = RequestContext::new(&request);
        let response = Next::new(&behaviors, &terminal).run(&ctx).await.unwrap();

        assert_eq!(response, json!({ "stale": true }));
        assert_eq!(cache.set_calls(), 0);
        assert!(cache.keys().is_empty());
    }

    #[tokio::test]
    async fn test_other_prefix_invalidation_still_caches() {
        let cache = Arc::new(MockCache::new());
        let generations = Arc::new(PrefixGenerations::new());
        let behaviors: Vec<Arc<dyn PipelineBehavior>> = vec![Arc::new(CachingBehavior::new(
            cache.clone(),
            TtlPolicy::default(),
            generations.clone(),
        ))];

        let racing = generations.clone();
        let terminal = move || {
            racing.advance("ListShelves:");
            async { Ok::<_, DomainError>(json!({ "call": 1 })) }.boxed()
        };

        let request = shelf("s1");
        let ctx = RequestContext::new(&request);
        Next::new(&behaviors, &terminal).run(&ctx).await.unwrap();

        assert_eq!(cache.keys(), vec!["FindShelf:id:s1"]);
    }
}
