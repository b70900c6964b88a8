//! Spam classification: policy, decision and reply parsing.
//!
//! - [`policy::ClassificationPolicy`]: the (model, system prompt) pair
//! - [`decision::ClassificationDecision`]: ALLOW/DENY plus optional reason
//! - [`parsing::parse_classifier_reply`]: raw model text to [`parsing::ClassifierReply`]

pub mod decision;
pub mod parsing;
pub mod policy;
