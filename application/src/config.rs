//! Application-level configuration.
//!
//! - [`PipelineConfig`]: per-process settings read by every request
//! - [`CaptchaGate`]: shared mutable state holding whether
//!   captcha verification is enforced

use relay_domain::captcha::DEFAULT_MIN_SCORE;
use relay_domain::{CaptchaState, ValidationRules};
use std::sync::atomic::{AtomicBool, Ordering};

/// Pipeline behavior configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Field and length rules. `require_captcha_token` is overridden per
    /// request from the [`CaptchaGate`] state.
    pub validation: ValidationRules,
    /// Minimum captcha score accepted when the service reports one.
    pub min_captcha_score: f64,
    /// Run the AI spam classifier. When false the stage is entered but
    /// approves without a decision.
    pub classifier_enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validation: ValidationRules::default(),
            min_captcha_score: DEFAULT_MIN_SCORE,
            classifier_enabled: true,
        }
    }
}

impl PipelineConfig {
    pub fn with_validation(mut self, validation: ValidationRules) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_min_captcha_score(mut self, score: f64) -> Self {
        self.min_captcha_score = score;
        self
    }

    pub fn with_classifier_enabled(mut self, enabled: bool) -> Self {
        self.classifier_enabled = enabled;
        self
    }
}

/// Shared captcha enforcement cell.
///
/// The runtime flag is an [`AtomicBool`] so concurrent requests and the
/// admin toggle never observe a torn value. Lab bypass is fixed at startup.
#[derive(Debug)]
pub struct CaptchaGate {
    enabled: AtomicBool,
    lab_bypass: bool,
}

impl CaptchaGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            lab_bypass: false,
        }
    }

    /// Bypass verification regardless of the flag (LAB mode only).
    pub fn with_lab_bypass(mut self, bypass: bool) -> Self {
        self.lab_bypass = bypass;
        self
    }

    /// Current runtime flag value.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Effective enforcement state for a request.
    pub fn state(&self) -> CaptchaState {
        if self.lab_bypass {
            CaptchaState::BypassedLab
        } else if self.is_enabled() {
            CaptchaState::Enforced
        } else {
            CaptchaState::DisabledByFlag
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Flip the runtime flag and return its new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::SeqCst)
    }
}
