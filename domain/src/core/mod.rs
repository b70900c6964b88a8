//! Core helpers shared across all subdomains.
//!
//! - [`string::truncate`]: UTF-8 safe truncation for log previews
//! - [`string::escape_html`]: escaping for user text placed into HTML mail

pub mod string;
