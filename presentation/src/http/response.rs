//! Pipeline result to HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_domain::{ErrorCode, PipelineResult};

/// Serialize `result` with the status its code maps to.
pub(crate) fn pipeline_response(result: PipelineResult) -> Response {
    let status = StatusCode::from_u16(result.status_class().http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(result)).into_response()
}

pub(crate) fn error_response(code: ErrorCode) -> Response {
    pipeline_response(PipelineResult::from_code(code))
}
