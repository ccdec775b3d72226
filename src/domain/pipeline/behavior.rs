//! Behavior chain primitives

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use super::request::{DynRequest, Purpose};
use crate::domain::cache::derive_key;
use crate::domain::DomainError;

/// Outcome of a pipeline step: the serialized response or the failure
pub type PipelineResult = Result<Value, DomainError>;

/// Innermost step of the chain, invoking the request's handler
pub type Terminal<'a> = dyn Fn() -> BoxFuture<'a, PipelineResult> + Send + Sync + 'a;

/// Per-call view of the request being dispatched
pub struct RequestContext<'a> {
    request: &'a dyn DynRequest,
}

impl<'a> RequestContext<'a> {
    pub fn new(request: &'a dyn DynRequest) -> Self {
        Self { request }
    }

    pub fn name(&self) -> &'static str {
        self.request.name()
    }

    pub fn purpose(&self) -> Purpose {
        self.request.purpose()
    }

    pub fn request(&self) -> &'a dyn DynRequest {
        self.request
    }

    /// Derives the cache key for this request
    pub fn cache_key(&self) -> Result<String, DomainError> {
        let fields = self.request.fields().map_err(|e| {
            DomainError::internal(format!(
                "Failed to serialize request '{}' for key derivation: {}",
                self.name(),
                e
            ))
        })?;

        Ok(derive_key(self.name(), &fields))
    }
}

/// A decorator around handler invocation
#[async_trait]
pub trait PipelineBehavior: Send + Sync + Debug {
    /// Name used in logs and ordering checks
    fn name(&self) -> &'static str;

    /// Handles the request, calling `next.run(ctx)` to continue the chain
    async fn handle(&self, ctx: &RequestContext<'_>, next: Next<'_>) -> PipelineResult;
}

/// Remainder of the chain after the current behavior
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn PipelineBehavior>],
    terminal: &'a Terminal<'a>,
}

impl<'a> Next<'a> {
    pub fn new(behaviors: &'a [Arc<dyn PipelineBehavior>], terminal: &'a Terminal<'a>) -> Self {
        Self {
            behaviors,
            terminal,
        }
    }

    /// Runs the next behavior, or the handler once the chain is exhausted
    pub async fn run(self, ctx: &RequestContext<'_>) -> PipelineResult {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                behavior
                    .handle(
                        ctx,
                        Next {
                            behaviors: rest,
                            terminal: self.terminal,
                        },
                    )
                    .await
            }
            None => (self.terminal)().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::{ReadShape, Request};
    use futures::FutureExt;
    use serde::Serialize;
    use std::sync::Mutex;
    use validator::Validate;

    #[derive(Serialize, Validate)]
    struct Ping {
        seq: u32,
    }

    impl Request for Ping {
        type Response = String;
        const NAME: &'static str = "Ping";
        const PURPOSE: Purpose = Purpose::Read(ReadShape::unclassified());
    }

    #[derive(Debug)]
    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl PipelineBehavior for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        async fn handle(&self, ctx: &RequestContext<'_>, next: Next<'_>) -> PipelineResult {
            self.log.lock().unwrap().push(format!("{}:before", self.label));
            let result = next.run(ctx).await;
            self.log.lock().unwrap().push(format!("{}:after", self.label));
            result
        }
    }

    #[derive(Debug)]
    struct ShortCircuit;

    #[async_trait]
    impl PipelineBehavior for ShortCircuit {
        fn name(&self) -> &'static str {
            "short"
        }

        async fn handle(&self, _ctx: &RequestContext<'_>, _next: Next<'_>) -> PipelineResult {
            Ok(Value::String("cached".to_string()))
        }
    }

    #[tokio::test]
    async fn test_behaviors_wrap_terminal_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let behaviors: Vec<Arc<dyn PipelineBehavior>> = vec![
            Arc::new(Recorder {
                label: "outer",
                log: log.clone(),
            }),
            Arc::new(Recorder {
                label: "inner",
                log: log.clone(),
            }),
        ];

        let terminal_log = log.clone();
        let terminal = move || {
            let log = terminal_log.clone();
            async move {
                log.lock().unwrap().push("handler".to_string());
                Ok::<_, DomainError>(Value::String("pong".to_string()))
            }
            .boxed()
        };

        let request = Ping { seq: 1 };
        let ctx = RequestContext::new(&request);
        let result = Next::new(&behaviors, &terminal).run(&ctx).await.unwrap();

        assert_eq!(result, Value::String("pong".to_string()));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "outer:before",
                "inner:before",
                "handler",
                "inner:after",
                "outer:after"
            ]
        );
    }

    #[tokio::test]
    async fn test_behavior_can_skip_terminal() {
        let behaviors: Vec<Arc<dyn PipelineBehavior>> = vec![Arc::new(ShortCircuit)];
        let calls = Arc::new(Mutex::new(0));

        let terminal_calls = calls.clone();
        let terminal = move || {
            let calls = terminal_calls.clone();
            async move {
                *calls.lock().unwrap() += 1;
                Ok::<_, DomainError>(Value::Null)
            }
            .boxed()
        };

        let request = Ping { seq: 1 };
        let ctx = RequestContext::new(&request);
        let result = Next::new(&behaviors, &terminal).run(&ctx).await.unwrap();

        assert_eq!(result, Value::String("cached".to_string()));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_context_derives_cache_key() {
        let request = Ping { seq: 7 };
        let ctx = RequestContext::new(&request);

        assert_eq!(ctx.name(), "Ping");
        assert_eq!(ctx.cache_key().unwrap(), "Ping:seq:7");
    }
}
