//! Captcha verification adapters.

mod recaptcha;

pub use recaptcha::RecaptchaVerifier;
