//! Mail dispatcher port
//!
//! Defines how an approved contact email is relayed to a delivery service.

use async_trait::async_trait;
use relay_domain::ContactEmail;
use thiserror::Error;

/// Errors that can occur while dispatching an email
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Relay rejected the message with HTTP {status}")]
    Rejected { status: u16 },

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Proof of a successful hand-off to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// Relay name, e.g. `"resend"` or `"smtp"`.
    pub provider: &'static str,
    /// Relay-assigned message id, when the relay returns one.
    pub message_id: Option<String>,
}

/// Relay for approved contact emails
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    async fn send(&self, email: &ContactEmail) -> Result<DispatchReceipt, DispatchError>;
}
