//! Captcha configuration from TOML (`[captcha]` section)

use relay_domain::captcha::DEFAULT_MIN_SCORE;
use serde::{Deserialize, Serialize};

pub const RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Raw captcha configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCaptchaConfig {
    /// Initial value of the runtime flag (the admin toggle flips it).
    pub enabled: bool,
    /// Skip verification entirely in LAB mode.
    pub bypass_in_lab: bool,
    /// Verification endpoint.
    pub verify_url: String,
    /// Environment variable holding the secret (default: "RECAPTCHA_SECRET_KEY").
    pub secret_key_env: String,
    /// Direct secret (not recommended; use the env var instead).
    pub secret_key: Option<String>,
    /// Minimum accepted score when the service reports one.
    pub min_score: f64,
}

impl Default for FileCaptchaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bypass_in_lab: false,
            verify_url: RECAPTCHA_VERIFY_URL.to_string(),
            secret_key_env: "RECAPTCHA_SECRET_KEY".to_string(),
            secret_key: None,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}
