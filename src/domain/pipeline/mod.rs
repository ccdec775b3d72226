//! Request pipeline domain - requests, handlers and behavior chain

mod behavior;
mod handler;
mod request;

pub use behavior::{Next, PipelineBehavior, PipelineResult, RequestContext, Terminal};
pub use handler::Handler;
pub use request::{DynRequest, Purpose, ReadShape, Request, Subject};
