//! Captcha verifier port
//!
//! Defines the interface for checking a client-supplied captcha token with
//! the verification service.

use async_trait::async_trait;
use relay_domain::CaptchaVerdict;
use thiserror::Error;

/// Errors that keep the verifier from producing a verdict.
///
/// A negative verdict is not an error: it comes back as a
/// [`CaptchaVerdict`] with `success: false`.
#[derive(Error, Debug)]
pub enum CaptchaError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Verification service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed verification response: {0}")]
    MalformedResponse(String),
}

/// Verifier for client captcha tokens
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Verify `token`, optionally bound to the client's IP address.
    async fn verify(
        &self,
        token: &str,
        client_ip: Option<&str>,
    ) -> Result<CaptchaVerdict, CaptchaError>;
}
