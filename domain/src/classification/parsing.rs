//! Classifier reply parsing.
//!
//! Turns the model's free-form text reply into a [`ClassifierReply`]. This is
//! pure domain logic with no I/O and no fallback.
//!
//! # Accepted shapes
//!
//! | Shape | Example |
//! |-------|---------|
//! | Bare token | `ALLOW`, `DENY` |
//! | JSON object | `{"decision": "DENY", "reason": "advertising"}` |
//! | Fenced JSON | ```` ```json\n{"decision": "ALLOW"}\n``` ```` |
//!
//! Everything else is [`ClassifierReply::Malformed`]. An ambiguous reply is
//! never treated as ALLOW.

use super::decision::{ClassificationDecision, Verdict};
use serde_json::Value;

/// Parsed classifier reply (tagged union).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierReply {
    /// The reply was exactly `ALLOW` or `DENY`.
    BareToken(Verdict),
    /// The reply was a JSON object with a valid `decision`.
    Structured(ClassificationDecision),
    /// Anything else; carries the raw reply for diagnostics.
    Malformed(String),
}

impl ClassifierReply {
    /// Convert into a decision, or return the raw text of a malformed reply.
    pub fn into_decision(self) -> Result<ClassificationDecision, String> {
        match self {
            ClassifierReply::BareToken(verdict) => Ok(ClassificationDecision::new(verdict, None)),
            ClassifierReply::Structured(decision) => Ok(decision),
            ClassifierReply::Malformed(raw) => Err(raw),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ClassifierReply::Malformed(_))
    }
}

/// Parse a raw classifier reply.
///
/// # Examples
///
/// ```
/// use relay_domain::{ClassifierReply, Verdict, parse_classifier_reply};
///
/// assert_eq!(parse_classifier_reply("DENY"), ClassifierReply::BareToken(Verdict::Deny));
/// assert!(parse_classifier_reply("maybe?").is_malformed());
/// ```
pub fn parse_classifier_reply(raw: &str) -> ClassifierReply {
    let trimmed = raw.trim();

    if let Some(verdict) = Verdict::from_token(trimmed) {
        return ClassifierReply::BareToken(verdict);
    }

    let body = strip_code_fence(trimmed).unwrap_or(trimmed);

    match parse_decision_object(body) {
        Some(decision) => ClassifierReply::Structured(decision),
        None => ClassifierReply::Malformed(raw.to_string()),
    }
}

/// Return the inside of a ```` ``` ```` / ```` ```json ```` fence, if the whole
/// reply is one fenced block.
fn strip_code_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let rest = rest.strip_suffix("```")?;
    // Drop the info string ("json", "JSON", ...) on the opening line
    let (first_line, remainder) = rest.split_once('\n')?;
    if !first_line.trim().chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(remainder.trim())
}

fn parse_decision_object(text: &str) -> Option<ClassificationDecision> {
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;
    let verdict = object
        .get("decision")
        .and_then(Value::as_str)
        .and_then(Verdict::from_token)?;
    let reason = object
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    Some(ClassificationDecision::new(verdict, reason))
}
