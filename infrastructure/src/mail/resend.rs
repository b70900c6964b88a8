//! Resend transactional email API.

use crate::http::describe;
use async_trait::async_trait;
use relay_application::{DispatchError, DispatchReceipt, MailDispatcher};
use relay_domain::ContactEmail;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const PROVIDER: &str = "resend";

#[derive(Debug, Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    reply_to: String,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

/// Sends contact emails through `POST /emails`.
pub struct ResendDispatcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
}

impl ResendDispatcher {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// `"Display Name" <address>`, with quotes and backslashes dropped from the name.
fn quoted_mailbox(name: &str, address: &str) -> String {
    let name: String = name.chars().filter(|c| !matches!(c, '"' | '\\')).collect();
    format!("\"{}\" <{}>", name.trim(), address)
}

#[async_trait]
impl MailDispatcher for ResendDispatcher {
    async fn send(&self, email: &ContactEmail) -> Result<DispatchReceipt, DispatchError> {
        let body = SendEmail {
            from: &self.from,
            to: [&self.to],
            subject: &email.subject,
            html: &email.html_body,
            text: &email.text_body,
            reply_to: quoted_mailbox(&email.reply_to_name, &email.reply_to),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                detail = %relay_domain::core::string::truncate(&detail, 200),
                "Resend rejected the message"
            );
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }

        // A 2xx without a readable id still means the message was accepted
        let message_id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.id);

        info!(message_id = ?message_id, "Contact email accepted by Resend");
        Ok(DispatchReceipt {
            provider: PROVIDER,
            message_id,
        })
    }
}
