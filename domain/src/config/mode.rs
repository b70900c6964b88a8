//! Operating mode value object

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Server operating mode.
///
/// `Secure` restricts CORS origins and applies rate limiting and security
/// headers. `Lab` disables them for demonstration, and may bypass captcha
/// verification when configured to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatingMode {
    #[default]
    #[serde(alias = "secure")]
    Secure,
    #[serde(alias = "lab")]
    Lab,
}

impl OperatingMode {
    pub fn is_lab(&self) -> bool {
        matches!(self, OperatingMode::Lab)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Secure => "SECURE",
            OperatingMode::Lab => "LAB",
        }
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SECURE" => Ok(OperatingMode::Secure),
            "LAB" => Ok(OperatingMode::Lab),
            other => Err(format!("unknown mode '{}', expected SECURE or LAB", other)),
        }
    }
}
