//! Field validation behavior

use async_trait::async_trait;
use tracing::debug;

use crate::domain::pipeline::{Next, PipelineBehavior, PipelineResult, RequestContext};
use crate::domain::DomainError;

/// Rejects requests whose fields fail their declared rules
///
/// Runs first so that an invalid request never touches the cache or a handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationBehavior;

impl ValidationBehavior {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineBehavior for ValidationBehavior {
    fn name(&self) -> &'static str {
        "validation"
    }

    async fn handle(&self, ctx: &RequestContext<'_>, next: Next<'_>) -> PipelineResult {
        if let Err(errors) = ctx.request().check() {
            let error = DomainError::from(errors);
            debug!(request = ctx.name(), error = %error, "Request failed validation");
            return Err(error);
        }

        next.run(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures::FutureExt;
    use serde::Serialize;
    use serde_json::Value;
    use validator::Validate;

    use super::*;
    use crate::domain::pipeline::{Purpose, Request, Subject};

    #[derive(Serialize, Validate)]
    struct RenameCategory {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
    }

    impl Request for RenameCategory {
        type Response = ();
        const NAME: &'static str = "RenameCategory";
        const PURPOSE: Purpose = Purpose::Write(Subject::Category);
    }

    async fn dispatch(request: &RenameCategory, calls: Arc<AtomicUsize>) -> PipelineResult {
        let behaviors: Vec<Arc<dyn PipelineBehavior>> = vec![Arc::new(ValidationBehavior)];
        let terminal = move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, DomainError>(Value::Null)
            }
            .boxed()
        };

        let ctx = RequestContext::new(request);
        Next::new(&behaviors, &terminal).run(&ctx).await
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let request = RenameCategory {
            name: String::new(),
        };

        let err = dispatch(&request, calls.clone()).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("name: must not be empty"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_request_continues() {
        let calls = Arc::new(AtomicUsize::new(0));
        let request = RenameCategory {
            name: "Tools".to_string(),
        };

        dispatch(&request, calls.clone()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
