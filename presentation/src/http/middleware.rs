//! Mode-dependent request middleware.
//!
//! SECURE mode restricts CORS to the configured origins, sets security
//! headers and rate limits `/api/*`. LAB mode accepts any origin and skips
//! the rest.

use super::client_ip::client_ip;
use super::response::error_response;
use super::state::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use relay_domain::ErrorCode;
use std::net::SocketAddr;
use tracing::warn;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const PREFLIGHT_MAX_AGE: &str = "600";

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    (
        "content-security-policy",
        "default-src 'none'; frame-ancestors 'none'",
    ),
];

enum OriginDecision {
    /// No `Origin` header: not a browser cross-origin request.
    Absent,
    Allowed(HeaderValue),
    Refused,
}

fn check_origin(state: &AppState, headers: &HeaderMap) -> OriginDecision {
    let Some(origin) = headers.get(header::ORIGIN) else {
        return OriginDecision::Absent;
    };

    if state.settings.mode.is_lab() {
        return OriginDecision::Allowed(HeaderValue::from_static("*"));
    }

    let allowed = origin.to_str().ok().is_some_and(|origin| {
        state
            .settings
            .allowed_origins
            .iter()
            .any(|allowed| allowed.trim_end_matches('/') == origin)
    });
    if allowed {
        OriginDecision::Allowed(origin.clone())
    } else {
        OriginDecision::Refused
    }
}

/// CORS: answers preflights, refuses unlisted origins in SECURE mode and
/// decorates responses for accepted ones.
pub(crate) async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let decision = check_origin(&state, request.headers());

    let allow_origin = match decision {
        OriginDecision::Absent => {
            if request.method() == Method::OPTIONS {
                return StatusCode::NO_CONTENT.into_response();
            }
            return next.run(request).await;
        }
        OriginDecision::Refused => {
            warn!(
                origin = ?request.headers().get(header::ORIGIN),
                path = %request.uri().path(),
                "Refusing cross-origin request"
            );
            return error_response(ErrorCode::Forbidden);
        }
        OriginDecision::Allowed(origin) => origin,
    };

    let mut response = if request.method() == Method::OPTIONS {
        let mut preflight = StatusCode::NO_CONTENT.into_response();
        let headers = preflight.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        preflight
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    response
}

pub(crate) async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(*name, HeaderValue::from_static(*value));
    }
    response
}

/// Per-client fixed-window limit. Over-limit requests get 429 with `Retry-After`.
pub(crate) async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(limiter) = &state.limiter else {
        return next.run(request).await;
    };

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let key = client_ip(request.headers(), peer, state.settings.trust_proxy)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            warn!(client_ip = %key, path = %request.uri().path(), "Rate limit exceeded");
            let mut response = error_response(ErrorCode::RateLimited);
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after.as_secs().max(1)),
            );
            response
        }
    }
}
