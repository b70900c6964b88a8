//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod captcha;
mod classifier;
mod logging;
mod mail;
mod server;
mod validation;

pub use captcha::{FileCaptchaConfig, RECAPTCHA_VERIFY_URL};
pub use classifier::{FileClassifierConfig, FilePolicyConfig, PolicySourceKind};
pub use logging::FileLoggingConfig;
pub use mail::{FileMailConfig, FileResendConfig, FileSmtpConfig, MailProviderKind, RESEND_ENDPOINT};
pub use server::{FileAdminConfig, FileRateLimitConfig, FileServerConfig};
pub use validation::FileValidationConfig;

use super::secret::{env_lookup, resolve_secret};
use relay_application::{CaptchaGate, PipelineConfig};
use relay_domain::{ConfigIssue, ConfigIssueCode, OperatingMode};
use serde::{Deserialize, Serialize};

const REDACTED: &str = "********";

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// SECURE (hardened) or LAB (demonstration)
    pub mode: OperatingMode,
    pub server: FileServerConfig,
    pub rate_limit: FileRateLimitConfig,
    pub admin: FileAdminConfig,
    pub captcha: FileCaptchaConfig,
    pub policy: FilePolicyConfig,
    pub classifier: FileClassifierConfig,
    pub mail: FileMailConfig,
    pub validation: FileValidationConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    pub fn captcha_secret(&self) -> Option<String> {
        resolve_secret(
            self.captcha.secret_key.as_deref(),
            &self.captcha.secret_key_env,
            env_lookup,
        )
    }

    pub fn classifier_api_key(&self) -> Option<String> {
        resolve_secret(
            self.classifier.api_key.as_deref(),
            &self.classifier.api_key_env,
            env_lookup,
        )
    }

    pub fn resend_api_key(&self) -> Option<String> {
        resolve_secret(
            self.mail.resend.api_key.as_deref(),
            &self.mail.resend.api_key_env,
            env_lookup,
        )
    }

    pub fn smtp_password(&self) -> Option<String> {
        resolve_secret(
            self.mail.smtp.password.as_deref(),
            &self.mail.smtp.password_env,
            env_lookup,
        )
    }

    pub fn admin_token(&self) -> Option<String> {
        resolve_secret(self.admin.token.as_deref(), &self.admin.token_env, env_lookup)
    }

    pub fn sink_token(&self) -> Option<String> {
        resolve_secret(
            self.logging.sink_token.as_deref(),
            &self.logging.sink_token_env,
            env_lookup,
        )
    }

    /// Whether LAB mode bypasses captcha verification entirely.
    pub fn captcha_bypassed(&self) -> bool {
        self.mode.is_lab() && self.captcha.bypass_in_lab
    }

    /// Pipeline settings for the use case.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_validation(self.validation.to_rules())
            .with_min_captcha_score(self.captcha.min_score)
            .with_classifier_enabled(self.classifier.enabled)
    }

    /// The shared captcha gate, initialised from `[captcha]` and the mode.
    pub fn to_captcha_gate(&self) -> CaptchaGate {
        CaptchaGate::new(self.captcha.enabled).with_lab_bypass(self.captcha_bypassed())
    }

    /// Copy with every direct secret value masked, for `--show-config`.
    pub fn redacted(&self) -> Self {
        let mask = |v: &Option<String>| v.as_ref().map(|_| REDACTED.to_string());
        let mut config = self.clone();
        config.captcha.secret_key = mask(&self.captcha.secret_key);
        config.classifier.api_key = mask(&self.classifier.api_key);
        config.mail.resend.api_key = mask(&self.mail.resend.api_key);
        config.mail.smtp.password = mask(&self.mail.smtp.password);
        config.admin.token = mask(&self.admin.token);
        config.logging.sink_token = mask(&self.logging.sink_token);
        config
    }

    /// Validate the entire configuration against the process environment.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.validate_with(env_lookup)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// `lookup` resolves `*_env` secret names.
    pub fn validate_with<F>(&self, lookup: F) -> Vec<ConfigIssue>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut issues = Vec::new();
        let secret = |direct: &Option<String>, env: &str| {
            resolve_secret(direct.as_deref(), env, &lookup).is_some()
        };

        // Server
        if self.server.outbound_timeout_secs == 0 {
            issues.push(out_of_range("server.outbound_timeout_secs", "0"));
        }
        for origin in &self.server.allowed_origins {
            check_url(&mut issues, "server.allowed_origins", origin);
        }
        if !self.mode.is_lab() && self.server.allowed_origins.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoAllowedOrigins,
                "server.allowed_origins is empty: cross-origin browsers are refused in SECURE mode",
            ));
        }
        if self.rate_limit.enabled {
            if self.rate_limit.max_requests == 0 {
                issues.push(out_of_range("rate_limit.max_requests", "0"));
            }
            if self.rate_limit.window_secs == 0 {
                issues.push(out_of_range("rate_limit.window_secs", "0"));
            }
        }

        // Admin
        if !secret(&self.admin.token, &self.admin.token_env) {
            let effect = if self.mode.is_lab() {
                "anyone can toggle captcha in LAB mode"
            } else {
                "the toggle endpoint answers 403 in SECURE mode"
            };
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::AdminEndpointUngated,
                format!(
                    "No admin token (set {} or admin.token): {}",
                    self.admin.token_env, effect
                ),
            ));
        }

        // Captcha
        if !(0.0..=1.0).contains(&self.captcha.min_score) {
            issues.push(out_of_range(
                "captcha.min_score",
                &self.captcha.min_score.to_string(),
            ));
        }
        check_url(&mut issues, "captcha.verify_url", &self.captcha.verify_url);
        if !self.captcha_bypassed()
            && !secret(&self.captcha.secret_key, &self.captcha.secret_key_env)
        {
            let code = ConfigIssueCode::MissingSecret {
                field: "captcha.secret_key".to_string(),
                env: self.captcha.secret_key_env.clone(),
            };
            if self.captcha.enabled {
                issues.push(ConfigIssue::error(
                    code,
                    format!("Captcha is enabled but {} is not set", self.captcha.secret_key_env),
                ));
            } else {
                issues.push(ConfigIssue::warning(
                    code,
                    format!(
                        "{} is not set: turning captcha on at runtime will fail every request",
                        self.captcha.secret_key_env
                    ),
                ));
            }
        }

        // Classifier and policy
        if self.classifier.enabled {
            check_url(&mut issues, "classifier.base_url", &self.classifier.base_url);
            if self.classifier.max_tokens == 0 {
                issues.push(out_of_range("classifier.max_tokens", "0"));
            }
            if !secret(&self.classifier.api_key, &self.classifier.api_key_env) {
                issues.push(missing_secret(
                    "classifier.api_key",
                    &self.classifier.api_key_env,
                ));
            }
            match self.policy.source {
                PolicySourceKind::Remote => {
                    for (field, value) in [
                        ("policy.model_url", &self.policy.model_url),
                        ("policy.prompt_url", &self.policy.prompt_url),
                    ] {
                        match value.as_deref() {
                            Some(url) if !url.trim().is_empty() => {
                                check_url(&mut issues, field, url)
                            }
                            _ => issues.push(empty_value(field)),
                        }
                    }
                }
                PolicySourceKind::Static => {
                    if self.policy.model.trim().is_empty() {
                        issues.push(empty_value("policy.model"));
                    }
                    if self.policy.system_prompt.trim().is_empty() {
                        issues.push(empty_value("policy.system_prompt"));
                    }
                }
            }
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::StageDisabled {
                    stage: "classifier".to_string(),
                },
                "classifier.enabled = false: submissions are delivered without spam filtering",
            ));
        }

        // Mail
        if self.mail.from.trim().is_empty() {
            issues.push(empty_value("mail.from"));
        }
        if self.mail.to.trim().is_empty() {
            issues.push(empty_value("mail.to"));
        }
        match self.mail.provider {
            MailProviderKind::Resend => {
                check_url(&mut issues, "mail.resend.endpoint", &self.mail.resend.endpoint);
                if !secret(&self.mail.resend.api_key, &self.mail.resend.api_key_env) {
                    issues.push(missing_secret(
                        "mail.resend.api_key",
                        &self.mail.resend.api_key_env,
                    ));
                }
            }
            MailProviderKind::Smtp => {
                if self.mail.smtp.host.trim().is_empty() {
                    issues.push(empty_value("mail.smtp.host"));
                }
                if self.mail.smtp.username.trim().is_empty() {
                    issues.push(empty_value("mail.smtp.username"));
                }
                if !secret(&self.mail.smtp.password, &self.mail.smtp.password_env) {
                    issues.push(missing_secret(
                        "mail.smtp.password",
                        &self.mail.smtp.password_env,
                    ));
                }
            }
        }

        // Validation
        if self.validation.max_message_chars == 0 {
            issues.push(out_of_range("validation.max_message_chars", "0"));
        }

        // Logging
        if let Some(url) = &self.logging.sink_url {
            check_url(&mut issues, "logging.sink_url", url);
        }

        issues
    }
}

fn check_url(issues: &mut Vec<ConfigIssue>, field: &str, value: &str) {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::InvalidUrl {
                field: field.to_string(),
                value: value.to_string(),
            },
            format!("{}: '{}' is not an http(s) URL", field, value),
        ));
    }
}

fn empty_value(field: &str) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::EmptyValue {
            field: field.to_string(),
        },
        format!("{} must not be empty", field),
    )
}

fn out_of_range(field: &str, value: &str) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
        },
        format!("{}: value {} is out of range", field, value),
    )
}

fn missing_secret(field: &str, env: &str) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::MissingSecret {
            field: field.to_string(),
            env: env.to_string(),
        },
        format!("{} is required: set {} or {}", field, env, field),
    )
}
