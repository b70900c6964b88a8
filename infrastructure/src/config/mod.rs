//! Configuration loading for contact-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `RELAY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./contact-relay.toml` or `./.contact-relay.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/contact-relay/config.toml`
//! 5. Default values

mod file_config;
mod loader;
pub mod secret;

pub use file_config::{
    FileAdminConfig, FileCaptchaConfig, FileClassifierConfig, FileConfig, FileLoggingConfig,
    FileMailConfig, FilePolicyConfig, FileRateLimitConfig, FileResendConfig, FileServerConfig,
    FileSmtpConfig, FileValidationConfig, MailProviderKind, PolicySourceKind,
    RECAPTCHA_VERIFY_URL, RESEND_ENDPOINT,
};
pub use loader::ConfigLoader;
