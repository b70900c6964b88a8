//! CLI command definitions

use clap::Parser;
use relay_domain::OperatingMode;
use std::path::PathBuf;

/// CLI arguments for contact-relay
#[derive(Parser, Debug)]
#[command(name = "contact-relay")]
#[command(author, version, about = "Contact-form relay with captcha and LLM spam filtering")]
#[command(long_about = r#"
contact-relay accepts contact-form submissions over HTTP and relays approved
ones by email.

Each submission passes through:
1. Validation: required fields, email shape, disposable domains, length cap
2. Captcha: reCAPTCHA verification (toggleable at runtime)
3. Spam filter: one chat-completion call with a remotely fetched policy
4. Delivery: Resend API or SMTP relay

Configuration files are loaded from (in priority order):
1. RELAY_* environment variables (RELAY_SERVER__PORT=8080)
2. --config <path>          Explicit config file
3. ./contact-relay.toml     Project-level config
4. ~/.config/contact-relay/config.toml   Global config

Example:
  contact-relay --port 8080
  contact-relay --mode lab -vv
  contact-relay --config /etc/contact-relay.toml --show-config
"#)]
pub struct Cli {
    /// Port to listen on (overrides server.port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Operating mode: SECURE or LAB (overrides mode)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<OperatingMode>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Filter directive implied by `-v`, if any.
    pub fn verbosity_filter(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
