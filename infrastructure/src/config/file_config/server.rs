//! Server configuration from TOML (`[server]`, `[rate_limit]`, `[admin]` sections)

use serde::{Deserialize, Serialize};

/// Raw HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Bind address (default: "0.0.0.0").
    pub host: String,
    /// Listen port (default: 3000).
    pub port: u16,
    /// Take the client address from the first `X-Forwarded-For` hop.
    pub trust_proxy: bool,
    /// Origins accepted by CORS in SECURE mode.
    pub allowed_origins: Vec<String>,
    /// Timeout for every outbound HTTP call, in seconds.
    pub outbound_timeout_secs: u64,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            trust_proxy: false,
            allowed_origins: Vec::new(),
            outbound_timeout_secs: 15,
        }
    }
}

/// Per-IP fixed-window limit on `/api/*` (SECURE mode only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRateLimitConfig {
    pub enabled: bool,
    /// Requests allowed per window.
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for FileRateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 10,
            window_secs: 60,
        }
    }
}

/// Admin endpoint credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAdminConfig {
    /// Environment variable holding the bearer token (default: "RELAY_ADMIN_TOKEN").
    pub token_env: String,
    /// Direct token (not recommended; use the env var instead).
    pub token: Option<String>,
}

impl Default for FileAdminConfig {
    fn default() -> Self {
        Self {
            token_env: "RELAY_ADMIN_TOKEN".to_string(),
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;

    #[test]
    fn test_server_section_deserialize() {
        let toml_str = r#"
[server]
port = 8080
trust_proxy = true
allowed_origins = ["https://example.com"]

[rate_limit]
max_requests = 3
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.trust_proxy);
        assert_eq!(config.server.allowed_origins, vec!["https://example.com"]);
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert!(config.rate_limit.enabled);
    }
}
