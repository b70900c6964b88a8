//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! Every outbound call of the contact pipeline goes through one of these.

pub mod captcha_verifier;
pub mod llm_gateway;
pub mod log_sink;
pub mod mail_dispatcher;
pub mod policy_source;
