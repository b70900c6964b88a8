//! Mail dispatch adapters.

mod resend;
mod smtp;

pub use resend::ResendDispatcher;
pub use smtp::{SmtpDispatcher, SmtpSettings};
