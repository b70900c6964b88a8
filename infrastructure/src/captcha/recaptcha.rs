//! reCAPTCHA `siteverify` client.

use crate::http::describe;
use async_trait::async_trait;
use relay_application::{CaptchaError, CaptchaVerifier};
use relay_domain::CaptchaVerdict;
use tracing::{debug, warn};

/// Verifies tokens against a reCAPTCHA-compatible `siteverify` endpoint.
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    verify_url: String,
    secret: String,
}

impl RecaptchaVerifier {
    pub fn new(
        client: reqwest::Client,
        verify_url: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            verify_url: verify_url.into(),
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(
        &self,
        token: &str,
        client_ip: Option<&str>,
    ) -> Result<CaptchaVerdict, CaptchaError> {
        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = client_ip {
            form.push(("remoteip", ip));
        }

        let response = self
            .client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!("Captcha verification request failed: {}", describe(&e));
                CaptchaError::ConnectionError(describe(&e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Captcha service returned an error status");
            return Err(CaptchaError::HttpStatus(status.as_u16()));
        }

        let verdict: CaptchaVerdict = response
            .json()
            .await
            .map_err(|e| CaptchaError::MalformedResponse(e.to_string()))?;

        debug!(
            success = verdict.success,
            score = ?verdict.score,
            errors = ?verdict.error_codes,
            "Captcha verdict received"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{closed_addr, spawn_stub_server};
    use axum::Json;
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;
    use serde_json::json;

    fn verifier(url: String) -> RecaptchaVerifier {
        RecaptchaVerifier::new(reqwest::Client::new(), url, "s3cret")
    }

    #[tokio::test]
    async fn test_posts_form_and_parses_verdict() {
        let (addr, mut rx) = spawn_stub_server(|_| {
            Json(json!({"success": true, "score": 0.9, "action": "contact"})).into_response()
        })
        .await;

        let verdict = verifier(format!("http://{}/siteverify", addr))
            .verify("tok+1/2=3&x", Some("203.0.113.7"))
            .await
            .unwrap();
        assert!(verdict.success);
        assert_eq!(verdict.score, Some(0.9));
        assert!(verdict.is_accepted(0.5));

        let request = rx.recv().await.unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.uri.path(), "/siteverify");
        assert_eq!(
            request.form(),
            vec![
                ("secret".to_string(), "s3cret".to_string()),
                ("response".to_string(), "tok+1/2=3&x".to_string()),
                ("remoteip".to_string(), "203.0.113.7".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_verdict_is_not_an_error() {
        let (addr, _rx) = spawn_stub_server(|_| {
            Json(json!({"success": false, "error-codes": ["invalid-input-response"]}))
                .into_response()
        })
        .await;

        let verdict = verifier(format!("http://{}/", addr))
            .verify("bad", None)
            .await
            .unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.error_codes, vec!["invalid-input-response"]);
        assert!(!verdict.is_accepted(0.5));
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let (addr, _rx) =
            spawn_stub_server(|_| StatusCode::SERVICE_UNAVAILABLE.into_response()).await;
        let err = verifier(format!("http://{}/", addr))
            .verify("tok", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptchaError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let (addr, _rx) = spawn_stub_server(|_| "<html>oops</html>".into_response()).await;
        let err = verifier(format!("http://{}/", addr))
            .verify("tok", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptchaError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let addr = closed_addr().await;
        let err = verifier(format!("http://{}/", addr))
            .verify("tok", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptchaError::ConnectionError(_)));
    }
}
