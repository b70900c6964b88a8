//! Input validation configuration from TOML (`[validation]` section)

use relay_domain::{DEFAULT_MAX_MESSAGE_CHARS, ValidationRules};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileValidationConfig {
    pub max_message_chars: usize,
    /// Added to the built-in disposable-domain list.
    pub extra_disposable_domains: Vec<String>,
}

impl Default for FileValidationConfig {
    fn default() -> Self {
        Self {
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            extra_disposable_domains: Vec::new(),
        }
    }
}

impl FileValidationConfig {
    /// Convert to domain rules. The captcha-token requirement is set per request.
    pub fn to_rules(&self) -> ValidationRules {
        ValidationRules::default()
            .with_max_message_chars(self.max_message_chars)
            .with_extra_disposable_domains(self.extra_disposable_domains.clone())
    }
}
