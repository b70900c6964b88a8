//! Dependency injection: configuration to adapters.

use anyhow::{Context, Result, bail};
use relay_application::{
    CaptchaVerifier, CompletionGateway, CompositeLogSink, LogSink, MailDispatcher, PolicySource,
    SubmitContactUseCase,
};
use relay_domain::ClassificationPolicy;
use relay_infrastructure::{
    FileConfig, HttpLogSink, JsonlLogSink, LogShipper, MailProviderKind, OpenAiCompatibleGateway,
    PolicySourceKind, RecaptchaVerifier, RemotePolicySource, ResendDispatcher, SmtpDispatcher,
    SmtpSettings, StaticPolicySource, build_client,
};
use relay_presentation::{HttpSettings, RateLimitSettings};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub fn outbound_timeout(config: &FileConfig) -> Duration {
    Duration::from_secs(config.server.outbound_timeout_secs)
}

/// Build the contact use case with every adapter selected by `config`.
pub fn build_use_case(
    config: &FileConfig,
    log_sink: Arc<dyn LogSink>,
) -> Result<SubmitContactUseCase> {
    let client = build_client(outbound_timeout(config)).context("Failed to build HTTP client")?;

    Ok(SubmitContactUseCase::new(
        captcha_verifier(config, client.clone()),
        policy_source(config, client.clone())?,
        completion_gateway(config, client.clone()),
        mail_dispatcher(config, client)?,
        Arc::new(config.to_captcha_gate()),
        config.to_pipeline_config(),
    )
    .with_log_sink(log_sink))
}

fn captcha_verifier(config: &FileConfig, client: reqwest::Client) -> Arc<dyn CaptchaVerifier> {
    let secret = config.captcha_secret().unwrap_or_default();
    if secret.is_empty() {
        warn!("No captcha secret configured; enabling captcha at runtime will fail verification");
    }
    Arc::new(RecaptchaVerifier::new(
        client,
        config.captcha.verify_url.clone(),
        secret,
    ))
}

fn policy_source(config: &FileConfig, client: reqwest::Client) -> Result<Arc<dyn PolicySource>> {
    let policy = &config.policy;
    match policy.source {
        PolicySourceKind::Remote => {
            let (Some(model_url), Some(prompt_url)) = (&policy.model_url, &policy.prompt_url)
            else {
                bail!("policy.source = \"remote\" requires policy.model_url and policy.prompt_url");
            };
            info!(
                model_url = %model_url,
                prompt_url = %prompt_url,
                "Using remote classifier policy"
            );
            Ok(Arc::new(RemotePolicySource::new(
                client,
                model_url.clone(),
                prompt_url.clone(),
            )))
        }
        PolicySourceKind::Static => {
            let policy = ClassificationPolicy::try_new(&policy.model, &policy.system_prompt)
                .context("policy.model and policy.system_prompt must not be empty")?;
            info!(model = %policy.model(), "Using static classifier policy");
            Ok(Arc::new(StaticPolicySource::new(policy)))
        }
    }
}

fn completion_gateway(config: &FileConfig, client: reqwest::Client) -> Arc<dyn CompletionGateway> {
    let classifier = &config.classifier;
    let gateway = OpenAiCompatibleGateway::new(
        client,
        &classifier.base_url,
        config.classifier_api_key().unwrap_or_default(),
    )
    .with_max_tokens(classifier.max_tokens);
    info!(
        endpoint = %gateway.endpoint(),
        enabled = classifier.enabled,
        "Spam classifier configured"
    );
    Arc::new(gateway)
}

fn mail_dispatcher(
    config: &FileConfig,
    client: reqwest::Client,
) -> Result<Arc<dyn MailDispatcher>> {
    let mail = &config.mail;
    match mail.provider {
        MailProviderKind::Resend => {
            let api_key = config.resend_api_key().with_context(|| {
                format!("Resend API key not set (env {})", mail.resend.api_key_env)
            })?;
            info!(endpoint = %mail.resend.endpoint, "Delivering mail through Resend");
            Ok(Arc::new(ResendDispatcher::new(
                client,
                mail.resend.endpoint.clone(),
                api_key,
                mail.from.clone(),
                mail.to.clone(),
            )))
        }
        MailProviderKind::Smtp => {
            let password = config.smtp_password().with_context(|| {
                format!("SMTP password not set (env {})", mail.smtp.password_env)
            })?;
            let settings = SmtpSettings {
                host: mail.smtp.host.clone(),
                port: mail.smtp.port,
                username: mail.smtp.username.clone(),
                password,
                timeout: outbound_timeout(config),
            };
            info!(host = %settings.host, port = settings.port, "Delivering mail through SMTP");
            let dispatcher = SmtpDispatcher::new(&settings, &mail.from, &mail.to)
                .context("Invalid SMTP configuration")?;
            Ok(Arc::new(dispatcher))
        }
    }
}

/// Log sinks selected by `[logging]`.
pub struct LogSinks {
    /// `None` when no sink is configured or none could be opened.
    pub sink: Option<Arc<dyn LogSink>>,
    /// Shipping task of the HTTP sink, drained at shutdown.
    pub shipper: Option<LogShipper>,
    /// Sinks that could not be opened. Reported once tracing is installed.
    pub unavailable: Vec<String>,
}

/// Open the configured log sinks.
///
/// Must be called inside the tokio runtime (the HTTP sink spawns its
/// shipping task).
pub fn log_sinks(config: &FileConfig) -> Result<LogSinks> {
    let mut sinks: Vec<Arc<dyn LogSink>> = Vec::new();
    let mut unavailable = Vec::new();
    let mut shipper = None;

    if let Some(path) = &config.logging.sink_file {
        match JsonlLogSink::open(path) {
            Ok(sink) => sinks.push(Arc::new(sink)),
            Err(e) => unavailable.push(format!("log sink file {}: {}", path.display(), e)),
        }
    }

    if let Some(url) = &config.logging.sink_url {
        let client =
            build_client(outbound_timeout(config)).context("Failed to build HTTP client")?;
        let (sink, handle) = HttpLogSink::spawn(client, url.clone(), config.sink_token());
        sinks.push(Arc::new(sink));
        shipper = Some(handle);
    }

    let sink = match sinks.len() {
        0 => None,
        1 => sinks.pop(),
        _ => Some(Arc::new(CompositeLogSink::new(sinks)) as Arc<dyn LogSink>),
    };
    Ok(LogSinks {
        sink,
        shipper,
        unavailable,
    })
}

/// HTTP-surface settings from `[server]`, `[rate_limit]` and `[admin]`.
pub fn http_settings(config: &FileConfig) -> HttpSettings {
    let rate_limit = config.rate_limit.enabled.then(|| RateLimitSettings {
        max_requests: config.rate_limit.max_requests,
        window: Duration::from_secs(config.rate_limit.window_secs),
    });

    HttpSettings::new(config.mode)
        .with_trust_proxy(config.server.trust_proxy)
        .with_allowed_origins(config.server.allowed_origins.clone())
        .with_admin_token(config.admin_token())
        .with_rate_limit(rate_limit)
}
