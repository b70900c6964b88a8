//! Classification policy port
//!
//! Defines where the spam filter's (model, system prompt) pair comes from.
//! Implementations must not memoize across calls: every request observes
//! the current policy.

use async_trait::async_trait;
use relay_domain::ClassificationPolicy;
use thiserror::Error;

/// Errors that can occur while loading a policy.
///
/// Partial success is still a failure: both the model and the prompt must
/// be available.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to fetch {resource}: {reason}")]
    FetchFailed {
        resource: &'static str,
        reason: String,
    },

    #[error("Fetched {0} is empty")]
    Empty(&'static str),
}

/// Source of the classification policy
#[async_trait]
pub trait PolicySource: Send + Sync {
    async fn fetch_policy(&self) -> Result<ClassificationPolicy, PolicyError>;
}
