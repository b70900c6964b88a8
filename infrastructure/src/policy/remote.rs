//! Policy fetched from two plain-text documents.

use crate::http::describe;
use async_trait::async_trait;
use futures::future::try_join;
use relay_application::{PolicyError, PolicySource};
use relay_domain::ClassificationPolicy;
use reqwest::header::CACHE_CONTROL;
use tracing::{debug, warn};

const MODEL: &str = "model";
const PROMPT: &str = "prompt";

/// Fetches the model identifier and the system prompt on every call.
///
/// Both requests run concurrently and carry a `t=<unix millis>` query
/// parameter plus `Cache-Control: no-cache`, so intermediate caches never
/// serve a stale policy.
pub struct RemotePolicySource {
    client: reqwest::Client,
    model_url: String,
    prompt_url: String,
}

impl RemotePolicySource {
    pub fn new(
        client: reqwest::Client,
        model_url: impl Into<String>,
        prompt_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model_url: model_url.into(),
            prompt_url: prompt_url.into(),
        }
    }

    async fn fetch_text(&self, resource: &'static str, url: &str) -> Result<String, PolicyError> {
        let cache_buster = chrono::Utc::now().timestamp_millis().to_string();
        let failed = |reason: String| {
            warn!(resource, "Policy fetch failed: {}", reason);
            PolicyError::FetchFailed { resource, reason }
        };

        let response = self
            .client
            .get(url)
            .query(&[("t", cache_buster.as_str())])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| failed(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {}", status.as_u16())));
        }

        let text = response.text().await.map_err(|e| failed(describe(&e)))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(PolicyError::Empty(resource));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl PolicySource for RemotePolicySource {
    async fn fetch_policy(&self) -> Result<ClassificationPolicy, PolicyError> {
        let (model, prompt) = try_join(
            self.fetch_text(MODEL, &self.model_url),
            self.fetch_text(PROMPT, &self.prompt_url),
        )
        .await?;

        debug!(model = %model, prompt_chars = prompt.chars().count(), "Remote policy fetched");
        ClassificationPolicy::try_new(&model, &prompt).ok_or(PolicyError::Empty(MODEL))
    }
}
