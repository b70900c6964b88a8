//! Captcha verification value objects.

use serde::{Deserialize, Serialize};

/// Minimum risk score accepted when the verification service reports one.
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

/// Verification result as reported by the captcha service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CaptchaVerdict {
    pub success: bool,
    /// Risk score in `0.0..=1.0` (v3-style services only).
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl CaptchaVerdict {
    /// Accept only on success and, when a score is present, a score of at
    /// least `min_score`.
    pub fn is_accepted(&self, min_score: f64) -> bool {
        if !self.success {
            return false;
        }
        match self.score {
            Some(score) => score >= min_score,
            None => true,
        }
    }
}

/// Explicit captcha enforcement state for one request.
///
/// Verification is never skipped implicitly: a skip is always one of the
/// named non-enforced states, and is logged by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptchaState {
    /// Tokens are required and verified.
    Enforced,
    /// Verification turned off by the runtime flag.
    DisabledByFlag,
    /// Verification bypassed because the server runs in LAB mode.
    BypassedLab,
}

impl CaptchaState {
    pub fn is_enforced(&self) -> bool {
        matches!(self, CaptchaState::Enforced)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptchaState::Enforced => "enforced",
            CaptchaState::DisabledByFlag => "disabled_by_flag",
            CaptchaState::BypassedLab => "bypassed_lab",
        }
    }
}

impl std::fmt::Display for CaptchaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_without_score_is_accepted() {
        let verdict = CaptchaVerdict {
            success: true,
            ..Default::default()
        };
        assert!(verdict.is_accepted(DEFAULT_MIN_SCORE));
    }

    #[test]
    fn test_score_threshold() {
        let at = CaptchaVerdict {
            success: true,
            score: Some(0.5),
            ..Default::default()
        };
        let below = CaptchaVerdict {
            success: true,
            score: Some(0.3),
            ..Default::default()
        };
        assert!(at.is_accepted(DEFAULT_MIN_SCORE));
        assert!(!below.is_accepted(DEFAULT_MIN_SCORE));
    }

    #[test]
    fn test_failure_is_rejected_regardless_of_score() {
        let verdict = CaptchaVerdict {
            success: false,
            score: Some(0.9),
            error_codes: vec!["timeout-or-duplicate".into()],
        };
        assert!(!verdict.is_accepted(DEFAULT_MIN_SCORE));
    }

    #[test]
    fn test_deserialize_siteverify_response() {
        let json = r#"{"success": true, "score": 0.7, "action": "contact", "hostname": "example.com"}"#;
        let verdict: CaptchaVerdict = serde_json::from_str(json).unwrap();
        assert!(verdict.success);
        assert_eq!(verdict.score, Some(0.7));
        assert!(verdict.error_codes.is_empty());

        let json = r#"{"success": false, "error-codes": ["invalid-input-response"]}"#;
        let verdict: CaptchaVerdict = serde_json::from_str(json).unwrap();
        assert_eq!(verdict.error_codes, vec!["invalid-input-response"]);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(CaptchaState::BypassedLab.to_string(), "bypassed_lab");
        assert!(CaptchaState::Enforced.is_enforced());
        assert!(!CaptchaState::DisabledByFlag.is_enforced());
    }
}
