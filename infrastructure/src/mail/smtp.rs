//! SMTP relay over STARTTLS.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use relay_application::{DispatchError, DispatchReceipt, MailDispatcher};
use relay_domain::ContactEmail;
use std::time::Duration;
use tracing::{info, warn};

const PROVIDER: &str = "smtp";

/// Connection settings for [`SmtpDispatcher`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

/// Relays contact emails through an authenticated SMTP server.
pub struct SmtpDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpDispatcher {
    /// Build the transport. Fails if `from` or `to` is not a valid mailbox.
    pub fn new(settings: &SmtpSettings, from: &str, to: &str) -> Result<Self, DispatchError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| DispatchError::Transport(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(settings.timeout))
            .build();

        Ok(Self {
            transport,
            from: parse_mailbox("from", from)?,
            to: parse_mailbox("to", to)?,
        })
    }
}

fn parse_mailbox(field: &str, value: &str) -> Result<Mailbox, DispatchError> {
    value
        .parse()
        .map_err(|e| DispatchError::InvalidMessage(format!("{} mailbox '{}': {}", field, value, e)))
}

/// Compose the MIME message: plain text and HTML alternatives, Reply-To the submitter.
pub(crate) fn build_message(
    email: &ContactEmail,
    from: &Mailbox,
    to: &Mailbox,
) -> Result<Message, DispatchError> {
    let reply_address: Address = email
        .reply_to
        .parse()
        .map_err(|e| DispatchError::InvalidMessage(format!("reply-to address: {}", e)))?;
    let reply_to = Mailbox::new(Some(email.reply_to_name.clone()), reply_address);

    Message::builder()
        .from(from.clone())
        .to(to.clone())
        .reply_to(reply_to)
        .subject(email.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .map_err(|e| DispatchError::InvalidMessage(e.to_string()))
}

#[async_trait]
impl MailDispatcher for SmtpDispatcher {
    async fn send(&self, email: &ContactEmail) -> Result<DispatchReceipt, DispatchError> {
        let message = build_message(email, &self.from, &self.to)?;

        let response = self.transport.send(message).await.map_err(|e| {
            warn!("SMTP delivery failed: {}", e);
            DispatchError::Transport(e.to_string())
        })?;

        let message_id = response.first_line().map(str::to_string);
        info!(code = %response.code(), "Contact email accepted by SMTP relay");
        Ok(DispatchReceipt {
            provider: PROVIDER,
            message_id,
        })
    }
}
