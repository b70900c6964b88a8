//! Per-client fixed-window rate limiting.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Limiter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client address.
///
/// Each key gets `max_requests` within a window that starts at its first
/// request. Expired windows are replaced lazily on the next request and can
/// be swept with [`RateLimiter::purge_expired`].
#[derive(Debug)]
pub struct RateLimiter {
    settings: RateLimitSettings,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: DashMap::new(),
        }
    }

    pub fn settings(&self) -> RateLimitSettings {
        self.settings
    }

    /// Count one request for `key`.
    ///
    /// Returns `Err(retry_after)` once the key has used up its window.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    pub(crate) fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        let window = entry.value_mut();

        if now.duration_since(window.started) >= self.settings.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.settings.max_requests {
            let elapsed = now.duration_since(window.started);
            return Err(self.settings.window.saturating_sub(elapsed));
        }

        window.count += 1;
        Ok(())
    }

    /// Drop windows that have fully elapsed.
    pub fn purge_expired(&self) {
        self.purge_expired_at(Instant::now());
    }

    pub(crate) fn purge_expired_at(&self, now: Instant) {
        let window = self.settings.window;
        self.windows.retain(|_, w| now.duration_since(w.started) < window);
    }

    /// Number of tracked clients.
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }
}
