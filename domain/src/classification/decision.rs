//! Classification decision value objects

use serde::{Deserialize, Serialize};

/// Outcome of the spam classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Allow,
    Deny,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Allow => "ALLOW",
            Verdict::Deny => "DENY",
        }
    }

    /// Exact, case-sensitive match on `ALLOW` / `DENY`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ALLOW" => Some(Verdict::Allow),
            "DENY" => Some(Verdict::Deny),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed classifier decision (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationDecision {
    pub verdict: Verdict,
    pub reason: Option<String>,
}

impl ClassificationDecision {
    pub fn new(verdict: Verdict, reason: Option<String>) -> Self {
        Self { verdict, reason }
    }

    pub fn allow() -> Self {
        Self::new(Verdict::Allow, None)
    }

    pub fn deny() -> Self {
        Self::new(Verdict::Deny, None)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }
}

/// Whether the spam classifier takes part in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierState {
    Active,
    /// Turned off by configuration; the stage approves without a decision.
    Disabled,
}

impl ClassifierState {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            ClassifierState::Active
        } else {
            ClassifierState::Disabled
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierState::Active => "active",
            ClassifierState::Disabled => "disabled",
        }
    }
}
