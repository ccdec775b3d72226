//! Request dispatch through the behavior chain

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::FutureExt;

use super::caching::CachingBehavior;
use super::generations::PrefixGenerations;
use super::invalidation::InvalidationBehavior;
use super::validation::ValidationBehavior;
use crate::domain::cache::{Cache, InvalidationMap, TtlPolicy};
use crate::domain::pipeline::{Handler, Next, PipelineBehavior, Request, RequestContext};
use crate::domain::DomainError;

/// Dispatches requests to their handlers, wrapped by an ordered behavior list
///
/// The first behavior registered is the outermost. Handlers are registered
/// per request type; each request type has at most one handler.
pub struct Mediator {
    behaviors: Vec<Arc<dyn PipelineBehavior>>,
    handlers: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl fmt::Debug for Mediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("behaviors", &self.behavior_names())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::default()
    }

    /// Builder preloaded with validation, caching and invalidation, in that order
    pub fn standard(
        cache: Arc<dyn Cache>,
        ttl_policy: TtlPolicy,
        rules: Arc<InvalidationMap>,
    ) -> MediatorBuilder {
        let generations = Arc::new(PrefixGenerations::new());

        Self::builder()
            .with_behavior(Arc::new(ValidationBehavior::new()))
            .with_behavior(Arc::new(CachingBehavior::new(
                cache.clone(),
                ttl_policy,
                generations.clone(),
            )))
            .with_behavior(Arc::new(InvalidationBehavior::new(cache, rules, generations)))
    }

    /// Behavior names from outermost to innermost
    pub fn behavior_names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    /// Sends a request through the pipeline and returns its handler's response
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, DomainError> {
        let handler = self.handler::<R>()?;

        let terminal = || {
            let handler = handler.clone();
            let request = &request;
            async move {
                let response = handler.handle(request).await?;
                serde_json::to_value(response).map_err(|e| {
                    DomainError::internal(format!(
                        "Failed to serialize '{}' response: {}",
                        R::NAME,
                        e
                    ))
                })
            }
            .boxed()
        };

        let ctx = RequestContext::new(&request);
        let value = Next::new(&self.behaviors, &terminal).run(&ctx).await?;

        serde_json::from_value(value).map_err(|e| {
            DomainError::internal(format!(
                "Failed to deserialize '{}' response: {}",
                R::NAME,
                e
            ))
        })
    }

    fn handler<R: Request>(&self) -> Result<Arc<dyn Handler<R>>, DomainError> {
        self.handlers
            .get(&TypeId::of::<R>())
            .and_then(|h| h.downcast_ref::<Arc<dyn Handler<R>>>())
            .cloned()
            .ok_or_else(|| {
                DomainError::internal(format!("No handler registered for '{}'", R::NAME))
            })
    }
}

/// Builder for [`Mediator`]
#[derive(Default)]
pub struct MediatorBuilder {
    behaviors: Vec<Arc<dyn PipelineBehavior>>,
    handlers: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl MediatorBuilder {
    /// Appends a behavior inside the ones already registered
    pub fn with_behavior(mut self, behavior: Arc<dyn PipelineBehavior>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Registers the handler for `R`, replacing any previous one
    pub fn with_handler<R: Request>(mut self, handler: Arc<dyn Handler<R>>) -> Self {
        self.handlers.insert(TypeId::of::<R>(), Arc::new(handler));
        self
    }

    pub fn build(self) -> Mediator {
        Mediator {
            behaviors: self.behaviors,
            handlers: self.handlers,
        }
    }
}
