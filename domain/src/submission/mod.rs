//! Contact-form submissions and their validation rules.
//!
//! - [`entities::Submission`]: raw, untrusted request payload
//! - [`entities::ValidSubmission`]: a submission that passed [`validation::validate_submission`]
//! - [`disposable`]: throwaway-mailbox domain denylist

pub mod disposable;
pub mod entities;
pub mod validation;
