//! Submission validation rules.
//!
//! [`validate_submission`] is pure: the same submission and rules always
//! produce the same result. Checks run in a fixed order:
//!
//! 1. Required fields (name, email, message, and the captcha token when required)
//! 2. Message length cap
//! 3. Email shape (`local@domain.tld`, atext local part, alphanumeric and
//!    hyphen domain labels)
//! 4. Disposable domain denylist

use super::disposable::is_disposable_domain;
use super::entities::{Field, Submission, ValidSubmission};
use crate::pipeline::result::ErrorCode;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Default message length cap, in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 2000;

/// Dot-separated atext local part, then at least two domain labels.
///
/// Mailbox delimiters (`<`, `>`, `,`, `;`, quotes, brackets) never match, so an
/// accepted address can be placed in a `Reply-To` header as-is.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    ))
    .expect("email pattern is a valid regex")
});

/// Errors produced by [`validate_submission`]. All are client-fixable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(Field),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Email domain not accepted: {0}")]
    DisposableEmail(String),

    #[error("Message too long: {actual} characters (max {max})")]
    MessageTooLong { max: usize, actual: usize },
}

impl ValidationError {
    /// Machine-readable code reported to the client.
    ///
    /// Disposable domains are reported as [`ErrorCode::InvalidEmail`].
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MissingField(_) => ErrorCode::MissingField,
            ValidationError::InvalidEmail | ValidationError::DisposableEmail(_) => {
                ErrorCode::InvalidEmail
            }
            ValidationError::MessageTooLong { .. } => ErrorCode::MessageTooLong,
        }
    }
}

/// Parameters for [`validate_submission`].
#[derive(Debug, Clone)]
pub struct ValidationRules {
    /// Maximum message length in characters (Unicode scalar values).
    pub max_message_chars: usize,
    /// Require a non-empty `recaptchaToken` (only when captcha is enforced).
    pub require_captcha_token: bool,
    /// Additional disposable domains on top of the built-in list.
    pub extra_disposable_domains: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            require_captcha_token: false,
            extra_disposable_domains: Vec::new(),
        }
    }
}

impl ValidationRules {
    pub fn with_max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = max;
        self
    }

    pub fn with_captcha_token_required(mut self, required: bool) -> Self {
        self.require_captcha_token = required;
        self
    }

    pub fn with_extra_disposable_domains(mut self, domains: Vec<String>) -> Self {
        self.extra_disposable_domains = domains;
        self
    }
}

fn required<'a>(value: Option<&'a str>, field: Field) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Validate a raw submission against `rules`.
pub fn validate_submission(
    submission: &Submission,
    rules: &ValidationRules,
) -> Result<ValidSubmission, ValidationError> {
    let name = required(submission.name.as_deref(), Field::Name)?;
    let email = required(submission.email.as_deref(), Field::Email)?;
    let message = required(submission.message.as_deref(), Field::Message)?;

    let token = match submission.recaptcha_token.as_deref() {
        Some(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
        _ => None,
    };
    if rules.require_captcha_token && token.is_none() {
        return Err(ValidationError::MissingField(Field::RecaptchaToken));
    }

    let actual = message.chars().count();
    if actual > rules.max_message_chars {
        return Err(ValidationError::MessageTooLong {
            max: rules.max_message_chars,
            actual,
        });
    }

    let email = email.trim();
    if !EMAIL_SHAPE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    let Some((_, domain)) = email.rsplit_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if is_disposable_domain(domain, &rules.extra_disposable_domains) {
        return Err(ValidationError::DisposableEmail(domain.to_ascii_lowercase()));
    }

    Ok(ValidSubmission::new(
        name.trim().to_string(),
        email.to_string(),
        message.to_string(),
        token,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ValidationRules {
        ValidationRules::default()
    }

    #[test]
    fn test_valid_submission() {
        let submission = Submission::new("Bo", " bo@example.com ", "Hello there");
        let valid = validate_submission(&submission, &rules()).unwrap();
        assert_eq!(valid.name(), "Bo");
        assert_eq!(valid.email(), "bo@example.com");
        assert_eq!(valid.message(), "Hello there");
        assert!(valid.recaptcha_token().is_none());
    }

    #[test]
    fn test_missing_fields() {
        let cases = [
            (
                Submission {
                    name: None,
                    ..Submission::new("", "bo@example.com", "hi")
                },
                Field::Name,
            ),
            (Submission::new("   ", "bo@example.com", "hi"), Field::Name),
            (Submission::new("Bo", "", "hi"), Field::Email),
            (
                Submission {
                    message: None,
                    ..Submission::new("Bo", "bo@example.com", "")
                },
                Field::Message,
            ),
            (Submission::new("Bo", "bo@example.com", "\n\t"), Field::Message),
        ];
        for (submission, field) in cases {
            assert_eq!(
                validate_submission(&submission, &rules()),
                Err(ValidationError::MissingField(field))
            );
        }
    }

    #[test]
    fn test_missing_field_takes_precedence() {
        // Missing name wins over a too-long message and a bad email
        let submission = Submission::new("", "not-an-email", "x".repeat(5000));
        assert_eq!(
            validate_submission(&submission, &rules()),
            Err(ValidationError::MissingField(Field::Name))
        );
    }

    #[test]
    fn test_captcha_token_required_only_when_enforced() {
        let submission = Submission::new("Bo", "bo@example.com", "hi");
        assert!(validate_submission(&submission, &rules()).is_ok());

        let enforced = rules().with_captcha_token_required(true);
        assert_eq!(
            validate_submission(&submission, &enforced),
            Err(ValidationError::MissingField(Field::RecaptchaToken))
        );

        let with_token = submission.with_recaptcha_token("tok");
        let valid = validate_submission(&with_token, &enforced).unwrap();
        assert_eq!(valid.recaptcha_token(), Some("tok"));
    }

    #[test]
    fn test_invalid_email_shapes() {
        for email in [
            "plainaddress",
            "@example.com",
            "bo@",
            "bo@example",
            "bo@@example.com",
            "bo smith@example.com",
            "bo@exa mple.com",
            "bo<x>@example.com",
            "x>,<evil@evil.com",
            "a,b@example.com",
            "bo@example.com>",
            "\"bo\"@example.com",
            "bo;x@example.com",
            "bo@[127.0.0.1]",
            "bo@exa_mple.com",
            "bo@-example.com",
            "bo@example..com",
            ".bo@example.com",
            "bo..smith@example.com",
        ] {
            let submission = Submission::new("Bo", email, "hi");
            assert_eq!(
                validate_submission(&submission, &rules()),
                Err(ValidationError::InvalidEmail),
                "expected {email} to be rejected"
            );
        }
    }

    #[test]
    fn test_accepted_email_shapes() {
        for email in [
            "bo@example.com",
            "bo.smith+contact@mail.example.co.uk",
            "o'brien@example.ie",
            "first_last-99@sub-domain.example.org",
            "BO@EXAMPLE.COM",
        ] {
            let submission = Submission::new("Bo", email, "hi");
            assert!(
                validate_submission(&submission, &rules()).is_ok(),
                "expected {email} to be accepted"
            );
        }
    }

    #[test]
    fn test_disposable_email_is_invalid_email() {
        // Scenario A
        let submission = Submission::new("Bo", "bo@mailinator.com", "hi");
        let err = validate_submission(&submission, &rules()).unwrap_err();
        assert_eq!(err, ValidationError::DisposableEmail("mailinator.com".into()));
        assert_eq!(err.code(), ErrorCode::InvalidEmail);

        let upper = Submission::new("Bo", "bo@YOPMAIL.com", "hi");
        assert_eq!(
            validate_submission(&upper, &rules()).unwrap_err().code(),
            ErrorCode::InvalidEmail
        );
    }

    #[test]
    fn test_extra_disposable_domains() {
        let rules = rules().with_extra_disposable_domains(vec!["spam.example".into()]);
        let submission = Submission::new("Bo", "bo@spam.example", "hi");
        assert_eq!(
            validate_submission(&submission, &rules).unwrap_err().code(),
            ErrorCode::InvalidEmail
        );
    }

    #[test]
    fn test_message_too_long() {
        // Scenario B
        let submission = Submission::new("Bo", "bo@example.com", "x".repeat(2001));
        assert_eq!(
            validate_submission(&submission, &rules()),
            Err(ValidationError::MessageTooLong {
                max: 2000,
                actual: 2001
            })
        );
    }

    #[test]
    fn test_message_at_cap_is_accepted() {
        let submission = Submission::new("Bo", "bo@example.com", "x".repeat(2000));
        assert!(validate_submission(&submission, &rules()).is_ok());
    }

    #[test]
    fn test_message_too_long_independent_of_email() {
        for email in ["bo@example.com", "not-an-email", "bo@mailinator.com"] {
            let submission = Submission::new("Bo", email, "y".repeat(2001));
            assert_eq!(
                validate_submission(&submission, &rules()).unwrap_err().code(),
                ErrorCode::MessageTooLong
            );
        }
    }

    #[test]
    fn test_message_length_counts_characters() {
        // 2000 two-byte characters is 4000 bytes but within the cap
        let submission = Submission::new("Bo", "bo@example.com", "é".repeat(2000));
        assert!(validate_submission(&submission, &rules()).is_ok());

        let small_cap = rules().with_max_message_chars(3);
        let submission = Submission::new("Bo", "bo@example.com", "éééé");
        assert_eq!(
            validate_submission(&submission, &small_cap),
            Err(ValidationError::MessageTooLong { max: 3, actual: 4 })
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let submission = Submission::new("Bo", "bo@mailinator.com", "hi");
        let first = validate_submission(&submission, &rules());
        let second = validate_submission(&submission, &rules());
        assert_eq!(first, second);
    }
}
