//! Response payload and error codes.

use crate::classification::decision::{ClassificationDecision, Verdict};
use serde::{Deserialize, Serialize};

/// How a response should be classified at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200
    Ok,
    /// 400: client-fixable input problem
    ClientError,
    /// 403
    Forbidden,
    /// 422: business rejection by the spam filter
    Rejected,
    /// 429
    RateLimited,
    /// 500: outage or internal failure
    ServerError,
}

impl StatusClass {
    pub fn http_status(&self) -> u16 {
        match self {
            StatusClass::Ok => 200,
            StatusClass::ClientError => 400,
            StatusClass::Forbidden => 403,
            StatusClass::Rejected => 422,
            StatusClass::RateLimited => 429,
            StatusClass::ServerError => 500,
        }
    }
}

/// Machine-readable error code carried by every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidBody,
    MissingField,
    InvalidEmail,
    MessageTooLong,
    CaptchaFailed,
    CaptchaUnavailable,
    PolicyUnavailable,
    ClassifierRejected,
    ClassifierMalformed,
    ClassifierUnavailable,
    DispatchFailed,
    RateLimited,
    Forbidden,
    Internal,
}

impl ErrorCode {
    pub fn status_class(&self) -> StatusClass {
        match self {
            ErrorCode::InvalidBody
            | ErrorCode::MissingField
            | ErrorCode::InvalidEmail
            | ErrorCode::MessageTooLong
            | ErrorCode::CaptchaFailed => StatusClass::ClientError,
            ErrorCode::ClassifierRejected => StatusClass::Rejected,
            ErrorCode::RateLimited => StatusClass::RateLimited,
            ErrorCode::Forbidden => StatusClass::Forbidden,
            ErrorCode::CaptchaUnavailable
            | ErrorCode::PolicyUnavailable
            | ErrorCode::ClassifierMalformed
            | ErrorCode::ClassifierUnavailable
            | ErrorCode::DispatchFailed
            | ErrorCode::Internal => StatusClass::ServerError,
        }
    }

    /// Short human-readable message safe to show to the client.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidBody => "Request body must be a JSON object",
            ErrorCode::MissingField => "Missing required field",
            ErrorCode::InvalidEmail => "Invalid email address",
            ErrorCode::MessageTooLong => "Message is too long",
            ErrorCode::CaptchaFailed => "Captcha verification failed",
            ErrorCode::CaptchaUnavailable => "Captcha verification is unavailable",
            ErrorCode::PolicyUnavailable => "Spam filter configuration is unavailable",
            ErrorCode::ClassifierRejected => "Message rejected by spam filter",
            ErrorCode::ClassifierMalformed => "Spam filter returned an invalid response",
            ErrorCode::ClassifierUnavailable => "Spam filter is unavailable",
            ErrorCode::DispatchFailed => "Message approved but could not be delivered",
            ErrorCode::RateLimited => "Too many requests",
            ErrorCode::Forbidden => "Forbidden",
            ErrorCode::Internal => "Internal error",
        }
    }
}

/// The single response payload produced per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub success: bool,
    pub email_sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_decision: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl PipelineResult {
    /// Email was dispatched. `decision` is `None` when the classifier is disabled.
    pub fn delivered(decision: Option<&ClassificationDecision>) -> Self {
        Self {
            success: true,
            email_sent: true,
            ai_decision: decision.map(|d| d.verdict),
            ai_reason: decision.and_then(|d| d.reason.clone()),
            error: None,
            code: None,
        }
    }

    /// Pipeline stopped with `code`.
    ///
    /// Pass the classifier decision when one was reached, so the client can
    /// tell "rejected by filter" from "approved but undeliverable".
    pub fn failed(
        code: ErrorCode,
        message: impl Into<String>,
        decision: Option<&ClassificationDecision>,
    ) -> Self {
        Self {
            success: false,
            email_sent: false,
            ai_decision: decision.map(|d| d.verdict),
            ai_reason: decision.and_then(|d| d.reason.clone()),
            error: Some(message.into()),
            code: Some(code),
        }
    }

    /// Failure with the code's default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::failed(code, code.default_message(), None)
    }

    pub fn status_class(&self) -> StatusClass {
        match self.code {
            Some(code) => code.status_class(),
            None => StatusClass::Ok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(ErrorCode::MissingField.status_class().http_status(), 400);
        assert_eq!(ErrorCode::InvalidEmail.status_class().http_status(), 400);
        assert_eq!(ErrorCode::MessageTooLong.status_class().http_status(), 400);
        assert_eq!(ErrorCode::CaptchaFailed.status_class().http_status(), 400);
        assert_eq!(ErrorCode::ClassifierRejected.status_class().http_status(), 422);
        assert_eq!(ErrorCode::CaptchaUnavailable.status_class().http_status(), 500);
        assert_eq!(ErrorCode::PolicyUnavailable.status_class().http_status(), 500);
        assert_eq!(ErrorCode::ClassifierMalformed.status_class().http_status(), 500);
        assert_eq!(ErrorCode::ClassifierUnavailable.status_class().http_status(), 500);
        assert_eq!(ErrorCode::DispatchFailed.status_class().http_status(), 500);
        assert_eq!(ErrorCode::RateLimited.status_class().http_status(), 429);
    }

    #[test]
    fn test_delivered_payload() {
        let decision = ClassificationDecision::allow().with_reason("looks legitimate");
        let result = PipelineResult::delivered(Some(&decision));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "emailSent": true,
                "aiDecision": "ALLOW",
                "aiReason": "looks legitimate"
            })
        );
        assert_eq!(result.status_class(), StatusClass::Ok);
    }

    #[test]
    fn test_delivered_without_classifier() {
        let json = serde_json::to_value(PipelineResult::delivered(None)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "emailSent": true}));
    }

    #[test]
    fn test_dispatch_failure_keeps_decision() {
        let decision = ClassificationDecision::allow();
        let result = PipelineResult::failed(
            ErrorCode::DispatchFailed,
            ErrorCode::DispatchFailed.default_message(),
            Some(&decision),
        );
        assert!(!result.success);
        assert!(!result.email_sent);
        assert_eq!(result.ai_decision, Some(Verdict::Allow));
        assert_eq!(result.status_class(), StatusClass::ServerError);
    }

    #[test]
    fn test_error_payload_shape() {
        let json =
            serde_json::to_value(PipelineResult::from_code(ErrorCode::InvalidEmail)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "emailSent": false,
                "error": "Invalid email address",
                "code": "InvalidEmail"
            })
        );
    }
}
