//! Mail configuration from TOML (`[mail]` section)

use serde::{Deserialize, Serialize};

pub const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Delivery backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProviderKind {
    #[default]
    Resend,
    Smtp,
}

/// Raw mail configuration from TOML
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMailConfig {
    pub provider: MailProviderKind,
    /// Sender mailbox, e.g. `"Contact Form <noreply@example.com>"`.
    pub from: String,
    /// Recipient mailbox for submissions.
    pub to: String,
    pub resend: FileResendConfig,
    pub smtp: FileSmtpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResendConfig {
    pub endpoint: String,
    /// Environment variable for the API key (default: "RESEND_API_KEY").
    pub api_key_env: String,
    pub api_key: Option<String>,
}

impl Default for FileResendConfig {
    fn default() -> Self {
        Self {
            endpoint: RESEND_ENDPOINT.to_string(),
            api_key_env: "RESEND_API_KEY".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSmtpConfig {
    pub host: String,
    /// STARTTLS submission port (default: 587).
    pub port: u16,
    pub username: String,
    /// Environment variable for the password (default: "SMTP_PASSWORD").
    pub password_env: String,
    pub password: Option<String>,
}

impl Default for FileSmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            username: String::new(),
            password_env: "SMTP_PASSWORD".to_string(),
            password: None,
        }
    }
}
