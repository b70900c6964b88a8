//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Default filter when neither `RUST_LOG` nor `-v` is given.
    pub level: String,
    /// Also write logs to this file (daily rotation).
    pub file: Option<PathBuf>,
    /// Append sink records to this JSONL file.
    pub sink_file: Option<PathBuf>,
    /// Remote ingestion endpoint for the log sink.
    pub sink_url: Option<String>,
    /// Environment variable for the sink bearer token (default: "LOG_SINK_TOKEN").
    pub sink_token_env: String,
    pub sink_token: Option<String>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            sink_file: None,
            sink_url: None,
            sink_token_env: "LOG_SINK_TOKEN".to_string(),
            sink_token: None,
        }
    }
}
