//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the transaction entity.

mod auth;
mod handlers;
mod payload;
mod rate_limit;
mod server;

pub use handlers::ApiError;
pub use payload::ValidatedTransaction;
pub use server::HttpServer;
