//! Outgoing contact email composition.

use crate::core::string::escape_html;
use crate::submission::entities::ValidSubmission;

/// An email built from an approved submission (Value Object)
///
/// Sender and recipient addresses are deployment configuration and are
/// supplied by the dispatcher; this carries only what depends on the
/// submission itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    /// Submitter's address, used as Reply-To.
    pub reply_to: String,
    /// Submitter's display name.
    pub reply_to_name: String,
}

impl ContactEmail {
    pub fn from_submission(submission: &ValidSubmission) -> Self {
        let subject = format!(
            "New contact form submission from {}",
            single_line(submission.name())
        );

        let html_body = format!(
            "<h2>New contact form submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>\n",
            escape_html(submission.name()),
            escape_html(submission.email()),
            escape_html(submission.message()).replace('\n', "<br>\n"),
        );

        let text_body = format!(
            "New contact form submission\n\nName: {}\nEmail: {}\n\nMessage:\n{}\n",
            submission.name(),
            submission.email(),
            submission.message(),
        );

        Self {
            subject,
            html_body,
            text_body,
            reply_to: submission.email().to_string(),
            reply_to_name: single_line(submission.name()),
        }
    }
}

/// Collapse CR/LF so user text cannot inject additional header lines.
fn single_line(s: &str) -> String {
    s.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
