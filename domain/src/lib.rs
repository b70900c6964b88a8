//! Domain layer for contact-relay
//!
//! This crate contains the core business rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Submission
//!
//! A contact-form submission (name, email, message, optional captcha token).
//! [`validate_submission`] turns a raw [`Submission`] into a [`ValidSubmission`]
//! or a [`ValidationError`]; it is a pure function of its inputs and the
//! disposable-domain denylist.
//!
//! ## Classification
//!
//! A [`ClassificationPolicy`] (model + system prompt) governs the spam filter
//! call. The model's raw reply is parsed by [`parse_classifier_reply`] into a
//! [`ClassifierReply`]; unrecognized shapes are [`ClassifierReply::Malformed`]
//! and never coerced to a decision.
//!
//! ## Pipeline
//!
//! [`PipelineRun`] tracks forward-only progress through the [`PipelineStage`]s
//! and every request ends in exactly one [`PipelineResult`].

pub mod captcha;
pub mod classification;
pub mod config;
pub mod core;
pub mod mail;
pub mod pipeline;
pub mod submission;

// Re-export commonly used types
pub use captcha::{CaptchaState, CaptchaVerdict};
pub use classification::{
    decision::{ClassificationDecision, ClassifierState, Verdict},
    parsing::{ClassifierReply, parse_classifier_reply},
    policy::ClassificationPolicy,
};
pub use config::{
    issue::{ConfigIssue, ConfigIssueCode, Severity},
    mode::OperatingMode,
};
pub use mail::ContactEmail;
pub use pipeline::{
    result::{ErrorCode, PipelineResult, StatusClass},
    stage::{PipelineRun, PipelineStage, StageTransitionError},
};
pub use submission::{
    disposable::is_disposable_domain,
    entities::{Field, Submission, ValidSubmission},
    validation::{DEFAULT_MAX_MESSAGE_CHARS, ValidationError, ValidationRules, validate_submission},
};
