//! Application layer for contact-relay
//!
//! This crate contains the contact pipeline use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CaptchaGate, PipelineConfig};
pub use ports::{
    captcha_verifier::{CaptchaError, CaptchaVerifier},
    llm_gateway::{CompletionGateway, CompletionRequest, GatewayError},
    log_sink::{CompositeLogSink, LogLevel, LogRecord, LogSink, NoLogSink},
    mail_dispatcher::{DispatchError, DispatchReceipt, MailDispatcher},
    policy_source::{PolicyError, PolicySource},
};
pub use use_cases::submit_contact::{
    Delivery, PIPELINE_TARGET, PipelineError, SubmitContactInput, SubmitContactUseCase,
};
