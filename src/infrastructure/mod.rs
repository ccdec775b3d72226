//! Infrastructure layer - Cache stores, repositories and the request pipeline

pub mod cache;
pub mod catalog;
pub mod category;
pub mod logging;
pub mod pipeline;
pub mod product;
