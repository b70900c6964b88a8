//! Classification policy sources.
//!
//! - [`RemotePolicySource`]: fetches model and prompt documents on every call
//! - [`StaticPolicySource`]: a fixed policy from configuration

mod remote;

pub use remote::RemotePolicySource;

use async_trait::async_trait;
use relay_application::{PolicyError, PolicySource};
use relay_domain::ClassificationPolicy;

/// Always returns the same policy.
pub struct StaticPolicySource {
    policy: ClassificationPolicy,
}

impl StaticPolicySource {
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }
}

impl Default for StaticPolicySource {
    fn default() -> Self {
        Self::new(ClassificationPolicy::default())
    }
}

#[async_trait]
impl PolicySource for StaticPolicySource {
    async fn fetch_policy(&self) -> Result<ClassificationPolicy, PolicyError> {
        Ok(self.policy.clone())
    }
}
