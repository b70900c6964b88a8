//! Presentation layer for contact-relay
//!
//! This crate contains the HTTP surface (axum router, handlers and the
//! mode-dependent CORS, security-header and rate-limit middleware) and the
//! CLI argument definitions.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{AppState, HttpSettings, RateLimitSettings, RateLimiter, build_router};
