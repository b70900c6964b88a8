//! Shared handler state.

use super::rate_limit::{RateLimitSettings, RateLimiter};
use relay_application::SubmitContactUseCase;
use relay_domain::OperatingMode;
use std::sync::Arc;

/// HTTP-surface settings fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    pub mode: OperatingMode,
    /// Take the client address from `X-Forwarded-For`.
    pub trust_proxy: bool,
    /// CORS origins accepted in SECURE mode.
    pub allowed_origins: Vec<String>,
    /// Bearer token for the captcha toggle.
    pub admin_token: Option<String>,
    /// Per-client limit on `/api/*` in SECURE mode; `None` disables it.
    pub rate_limit: Option<RateLimitSettings>,
}

impl HttpSettings {
    pub fn new(mode: OperatingMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = trust;
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn with_admin_token(mut self, token: Option<String>) -> Self {
        self.admin_token = token;
        self
    }

    pub fn with_rate_limit(mut self, limit: Option<RateLimitSettings>) -> Self {
        self.rate_limit = limit;
        self
    }
}

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub(crate) use_case: SubmitContactUseCase,
    pub(crate) settings: Arc<HttpSettings>,
    pub(crate) limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    /// The rate limiter is only built in SECURE mode.
    pub fn new(use_case: SubmitContactUseCase, settings: HttpSettings) -> Self {
        let limiter = match (settings.mode, settings.rate_limit) {
            (OperatingMode::Secure, Some(limit)) => Some(Arc::new(RateLimiter::new(limit))),
            _ => None,
        };
        Self {
            use_case,
            settings: Arc::new(settings),
            limiter,
        }
    }

    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    pub fn rate_limiter(&self) -> Option<&Arc<RateLimiter>> {
        self.limiter.as_ref()
    }
}
