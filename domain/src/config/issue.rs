//! Configuration issues detected at startup.
//!
//! Config validation never fails fast: it collects every issue with a
//! severity so the binary can print all of them before deciding whether to
//! start.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A secret (API key, captcha secret, password) is required but not set.
    MissingSecret { field: String, env: String },
    /// A required non-secret value is empty.
    EmptyValue { field: String },
    /// A value is outside its accepted range.
    OutOfRange { field: String, value: String },
    /// A URL does not start with http:// or https://.
    InvalidUrl { field: String, value: String },
    /// An enum-like string did not match any accepted value.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A pipeline stage is switched off.
    StageDisabled { stage: String },
    /// SECURE mode without any allowed CORS origin.
    NoAllowedOrigins,
    /// The admin toggle endpoint has no token configured.
    AdminEndpointUngated,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
