//! LLM Gateway port
//!
//! Defines the interface for single-shot chat completions used by the spam
//! classifier.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with HTTP {status}")]
    RequestFailed { status: u16 },

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty completion")]
    EmptyCompletion,
}

/// One completion: a system message followed by one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_content: String,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_content: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_content: user_content.into(),
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to a chat-completion
/// provider. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send the request and return the assistant's raw text reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}
