//! Request handler contract

use async_trait::async_trait;

use super::request::Request;
use crate::domain::DomainError;

/// Business handler for one request type
#[async_trait]
pub trait Handler<R: Request>: Send + Sync {
    async fn handle(&self, request: &R) -> Result<R::Response, DomainError>;
}
