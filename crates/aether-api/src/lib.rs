//! Axum HTTP API server.
//!
//! This crate provides:
//! - Collection theme analysis and lookup endpoints
//! - Single image classification
//! - Per-client rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use middleware::ClientRateLimiter;
pub use routes::{create_router, create_router_with_limiter};
pub use state::AppState;
