//! HTTP surface
//!
//! - `GET /healthz`: liveness
//! - `POST /api/contact`: run one submission through the pipeline
//! - `POST /api/toggle-recaptcha`: flip the runtime captcha flag
//!
//! Serve the router with
//! `into_make_service_with_connect_info::<SocketAddr>()` so the socket peer
//! is available for client-address resolution.

pub mod client_ip;
mod handlers;
mod middleware;
pub mod rate_limit;
mod response;
pub mod state;


pub use rate_limit::{RateLimitSettings, RateLimiter};
pub use state::{AppState, HttpSettings};

use axum::Router;
use axum::routing::{get, post};

/// Build the application router for `state`'s operating mode.
pub fn build_router(state: AppState) -> Router {
    let mut api = Router::new()
        .route("/api/contact", post(handlers::submit_contact))
        .route("/api/toggle-recaptcha", post(handlers::toggle_recaptcha));
    if state.limiter.is_some() {
        api = api.route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit,
        ));
    }

    let mut router = Router::new()
        .route("/healthz", get(handlers::healthz))
        .merge(api)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::cors,
        ));
    if !state.settings.mode.is_lab() {
        router = router.layer(axum::middleware::from_fn(middleware::security_headers));
    }

    router.with_state(state)
}
