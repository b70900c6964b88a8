//! Route handlers.

use super::client_ip::client_ip;
use super::response::{error_response, pipeline_response};
use super::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use relay_application::SubmitContactInput;
use relay_domain::{CaptchaState, ErrorCode, Submission};
use serde::Serialize;
use std::net::SocketAddr;
use tracing::{info, warn};

/// GET /healthz
pub(crate) async fn healthz() -> &'static str {
    "OK"
}

/// POST /api/contact
pub(crate) async fn submit_contact(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<Submission>, JsonRejection>,
) -> Response {
    let Json(submission) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "Unreadable contact request body");
            return error_response(ErrorCode::InvalidBody);
        }
    };

    let mut input = SubmitContactInput::new(submission);
    if let Some(ip) = client_ip(&headers, peer.map(|p| p.0), state.settings.trust_proxy) {
        input = input.with_client_ip(ip.to_string());
    }

    let result = match state.use_case.execute(input).await {
        Ok(delivery) => delivery.to_result(),
        Err(err) => err.to_result(),
    };
    pipeline_response(result)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToggleResponse {
    pub recaptcha_enabled: bool,
    pub state: CaptchaState,
}

/// POST /api/toggle-recaptcha
pub(crate) async fn toggle_recaptcha(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if !is_admin(&state, &headers) {
        warn!("Refusing captcha toggle: missing or wrong admin token");
        return error_response(ErrorCode::Forbidden);
    }

    let gate = state.use_case.gate();
    let enabled = gate.toggle();
    let captcha = gate.state();
    info!(enabled, state = ?captcha, "Captcha verification toggled");

    Json(ToggleResponse {
        recaptcha_enabled: enabled,
        state: captcha,
    })
    .into_response()
}

/// With a configured token, require `Authorization: Bearer <token>`.
/// Without one, only LAB mode may toggle.
fn is_admin(state: &AppState, headers: &HeaderMap) -> bool {
    match &state.settings.admin_token {
        Some(expected) => headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .is_some_and(|token| token.trim() == expected),
        None => state.settings.mode.is_lab(),
    }
}
