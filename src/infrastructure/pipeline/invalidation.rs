//! Post-write cache invalidation behavior

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::generations::PrefixGenerations;
use super::metrics;
use crate::domain::cache::{Cache, InvalidationMap};
use crate::domain::pipeline::{Next, PipelineBehavior, PipelineResult, RequestContext, Subject};

/// Purges cached reads affected by a successful write
///
/// Runs the handler first; a failed write purges nothing. Purge failures are
/// logged and never change the write's outcome. The purge runs on its own
/// task, so it finishes even if the caller stops waiting for the response.
#[derive(Debug, Clone)]
pub struct InvalidationBehavior {
    cache: Arc<dyn Cache>,
    rules: Arc<InvalidationMap>,
    generations: Arc<PrefixGenerations>,
}

impl InvalidationBehavior {
    pub fn new(
        cache: Arc<dyn Cache>,
        rules: Arc<InvalidationMap>,
        generations: Arc<PrefixGenerations>,
    ) -> Self {
        Self {
            cache,
            rules,
            generations,
        }
    }
}

#[async_trait]
impl PipelineBehavior for InvalidationBehavior {
    fn name(&self) -> &'static str {
        "invalidation"
    }

    async fn handle(&self, ctx: &RequestContext<'_>, next: Next<'_>) -> PipelineResult {
        let Some(subject) = ctx.purpose().subject() else {
            return next.run(ctx).await;
        };

        let response = next.run(ctx).await?;

        if !self.rules.is_mapped(subject.as_str()) {
            warn!(
                request = ctx.name(),
                subject = %subject,
                "No invalidation rule for write subject"
            );
            metrics::record_unmapped_subject(subject);
            return Ok(response);
        }

        let purge = Purge {
            cache: self.cache.clone(),
            generations: self.generations.clone(),
            request: ctx.name(),
            subject,
            prefixes: self
                .rules
                .affected_prefixes(subject.as_str())
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        if let Err(e) = tokio::spawn(purge.run()).await {
            warn!(
                request = ctx.name(),
                subject = %subject,
                error = %e,
                "Cache invalidation task failed"
            );
            metrics::record_cache_error("delete_prefix");
        }

        Ok(response)
    }
}

/// One write's purge, owned so it can outlive the request
struct Purge {
    cache: Arc<dyn Cache>,
    generations: Arc<PrefixGenerations>,
    request: &'static str,
    subject: Subject,
    prefixes: Vec<String>,
}

impl Purge {
    async fn run(self) -> usize {
        let Purge {
            cache,
            generations,
            request,
            subject,
            prefixes,
        } = self;

        let mut purged = 0;
        for prefix in &prefixes {
            // Advanced before the purge so a read storing concurrently sees it
            generations.advance(prefix);

            match cache.delete_prefix(prefix).await {
                Ok(count) => {
                    debug!(subject = %subject, prefix = %prefix, count, "Purged cached reads");
                    purged += count;
                }
                Err(e) => {
                    warn!(
                        request,
                        subject = %subject,
                        prefix = %prefix,
                        error = %e,
                        "Cache invalidation failed"
                    );
                    metrics::record_cache_error("delete_prefix");
                }
            }
        }

        info!(request, subject = %subject, purged, "Invalidated cache after write");
        metrics::record_invalidation(subject, purged);

        purged
    }
}
