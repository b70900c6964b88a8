//! Infrastructure layer for contact-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod captcha;
pub mod config;
pub mod http;
pub mod llm;
pub mod logging;
pub mod mail;
pub mod policy;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use captcha::RecaptchaVerifier;
pub use config::{ConfigLoader, FileConfig, MailProviderKind, PolicySourceKind};
pub use http::build_client;
pub use llm::OpenAiCompatibleGateway;
pub use logging::{HttpLogSink, JsonlLogSink, LogShipper, LogSinkLayer};
pub use mail::{ResendDispatcher, SmtpDispatcher, SmtpSettings};
pub use policy::{RemotePolicySource, StaticPolicySource};
