//! Submit Contact use case.
//!
//! Runs one contact-form submission through the pipeline:
//!
//! ```text
//! Received ─validate─▶ Validated ─captcha─▶ CaptchaChecked ─policy─▶ PolicyLoaded
//!          ─classify─▶ Classified ─dispatch─▶ Dispatched ─▶ Responded
//! ```
//!
//! Any stage may stop the run; no stage executes after a failure, and no
//! outbound call happens before validation succeeds. Each failure is
//! converted into a [`PipelineError`] at its own stage boundary, and the
//! caller turns that into exactly one [`PipelineResult`].

use crate::config::{CaptchaGate, PipelineConfig};
use crate::ports::captcha_verifier::{CaptchaError, CaptchaVerifier};
use crate::ports::llm_gateway::{CompletionGateway, CompletionRequest, GatewayError};
use crate::ports::log_sink::{LogLevel, LogRecord, LogSink, NoLogSink};
use crate::ports::mail_dispatcher::{DispatchError, DispatchReceipt, MailDispatcher};
use crate::ports::policy_source::{PolicyError, PolicySource};
use relay_domain::core::string::truncate;
use relay_domain::{
    CaptchaState, ClassificationDecision, ClassificationPolicy, ClassifierState, ContactEmail,
    ErrorCode, PipelineResult, PipelineRun, PipelineStage, StageTransitionError, Submission,
    ValidSubmission, ValidationError, parse_classifier_reply, validate_submission,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Target of pipeline milestone records. Milestones go to the [`LogSink`]
/// directly, so tracing events with this target are not forwarded to it.
pub const PIPELINE_TARGET: &str = "contact_pipeline";

/// Errors that end a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Captcha rejected (score: {score:?}, errors: {error_codes:?})")]
    CaptchaFailed {
        score: Option<f64>,
        error_codes: Vec<String>,
    },

    #[error("Captcha service unavailable: {0}")]
    CaptchaUnavailable(#[source] CaptchaError),

    #[error("Classification policy unavailable: {0}")]
    PolicyUnavailable(#[source] PolicyError),

    #[error("Rejected by spam classifier")]
    ClassifierRejected(ClassificationDecision),

    #[error("Classifier reply not understood: {}", truncate(.raw, 120))]
    ClassifierMalformed { raw: String },

    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(#[source] GatewayError),

    #[error("Dispatch failed: {source}")]
    DispatchFailed {
        decision: Option<ClassificationDecision>,
        #[source]
        source: DispatchError,
    },

    #[error("Pipeline state error: {0}")]
    Internal(#[from] StageTransitionError),
}

impl PipelineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PipelineError::Validation(e) => e.code(),
            PipelineError::CaptchaFailed { .. } => ErrorCode::CaptchaFailed,
            PipelineError::CaptchaUnavailable(_) => ErrorCode::CaptchaUnavailable,
            PipelineError::PolicyUnavailable(_) => ErrorCode::PolicyUnavailable,
            PipelineError::ClassifierRejected(_) => ErrorCode::ClassifierRejected,
            PipelineError::ClassifierMalformed { .. } => ErrorCode::ClassifierMalformed,
            PipelineError::ClassifierUnavailable(_) => ErrorCode::ClassifierUnavailable,
            PipelineError::DispatchFailed { .. } => ErrorCode::DispatchFailed,
            PipelineError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// The classifier decision reached before the failure, if any.
    pub fn decision(&self) -> Option<&ClassificationDecision> {
        match self {
            PipelineError::ClassifierRejected(decision) => Some(decision),
            PipelineError::DispatchFailed { decision, .. } => decision.as_ref(),
            _ => None,
        }
    }

    /// Message shown to the client.
    ///
    /// Validation errors describe the input problem; everything else uses the
    /// code's fixed message so upstream details never leak.
    pub fn client_message(&self) -> String {
        match self {
            PipelineError::Validation(e) => e.to_string(),
            other => other.code().default_message().to_string(),
        }
    }

    pub fn to_result(&self) -> PipelineResult {
        PipelineResult::failed(self.code(), self.client_message(), self.decision())
    }
}

/// Input for the [`SubmitContactUseCase`].
#[derive(Debug, Clone)]
pub struct SubmitContactInput {
    pub submission: Submission,
    /// Client address forwarded to the captcha service.
    pub client_ip: Option<String>,
}

impl SubmitContactInput {
    pub fn new(submission: Submission) -> Self {
        Self {
            submission,
            client_ip: None,
        }
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }
}

/// Successful outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// `None` when the classifier is disabled.
    pub decision: Option<ClassificationDecision>,
    pub receipt: DispatchReceipt,
    pub captcha: CaptchaState,
    pub classifier: ClassifierState,
}

impl Delivery {
    pub fn to_result(&self) -> PipelineResult {
        PipelineResult::delivered(self.decision.as_ref())
    }
}

/// Use case for relaying a contact-form submission.
pub struct SubmitContactUseCase {
    captcha: Arc<dyn CaptchaVerifier>,
    policy_source: Arc<dyn PolicySource>,
    gateway: Arc<dyn CompletionGateway>,
    dispatcher: Arc<dyn MailDispatcher>,
    gate: Arc<CaptchaGate>,
    config: PipelineConfig,
    log_sink: Arc<dyn LogSink>,
}

impl Clone for SubmitContactUseCase {
    fn clone(&self) -> Self {
        Self {
            captcha: self.captcha.clone(),
            policy_source: self.policy_source.clone(),
            gateway: self.gateway.clone(),
            dispatcher: self.dispatcher.clone(),
            gate: self.gate.clone(),
            config: self.config.clone(),
            log_sink: self.log_sink.clone(),
        }
    }
}

impl SubmitContactUseCase {
    pub fn new(
        captcha: Arc<dyn CaptchaVerifier>,
        policy_source: Arc<dyn PolicySource>,
        gateway: Arc<dyn CompletionGateway>,
        dispatcher: Arc<dyn MailDispatcher>,
        gate: Arc<CaptchaGate>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            captcha,
            policy_source,
            gateway,
            dispatcher,
            gate,
            config,
            log_sink: Arc::new(NoLogSink),
        }
    }

    /// Create with a log sink for pipeline events.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = sink;
        self
    }

    /// The shared captcha gate (also driven by the admin toggle).
    pub fn gate(&self) -> &Arc<CaptchaGate> {
        &self.gate
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one submission to completion.
    pub async fn execute(&self, input: SubmitContactInput) -> Result<Delivery, PipelineError> {
        let mut run = PipelineRun::new();
        let outcome = self.run_stages(&mut run, input).await;

        match &outcome {
            Ok(delivery) => {
                run.respond()?;
                info!(
                    target: PIPELINE_TARGET,
                    provider = delivery.receipt.provider,
                    decision = delivery.decision.as_ref().map(|d| d.verdict.as_str()),
                    "Contact submission delivered"
                );
                self.log_sink.emit(
                    LogRecord::new(LogLevel::Info, PIPELINE_TARGET, "submission_delivered")
                        .with_fields(serde_json::json!({
                            "provider": delivery.receipt.provider,
                            "messageId": delivery.receipt.message_id,
                            "aiDecision": delivery.decision.as_ref().map(|d| d.verdict.as_str()),
                            "captcha": delivery.captcha.as_str(),
                            "classifier": delivery.classifier.as_str(),
                        })),
                );
            }
            Err(error) => {
                let stage = run.stage();
                match error {
                    // Approved but undeliverable still ends in Responded
                    PipelineError::DispatchFailed { .. } => run.respond()?,
                    PipelineError::Internal(_) => {}
                    other => run.reject(other.code())?,
                }
                warn!(
                    target: PIPELINE_TARGET,
                    stage = %stage,
                    code = ?error.code(),
                    "Contact submission stopped: {}",
                    error
                );
                self.log_sink.emit(
                    LogRecord::new(LogLevel::Warn, PIPELINE_TARGET, "submission_rejected")
                        .with_fields(serde_json::json!({
                            "stage": stage.as_str(),
                            "code": error.code(),
                            "aiDecision": error.decision().map(|d| d.verdict.as_str()),
                        })),
                );
            }
        }

        outcome
    }

    async fn run_stages(
        &self,
        run: &mut PipelineRun,
        input: SubmitContactInput,
    ) -> Result<Delivery, PipelineError> {
        let captcha_state = self.gate.state();
        let classifier_state = ClassifierState::from_enabled(self.config.classifier_enabled);
        let client_ip = input.client_ip.as_deref();

        // Validated
        let rules = self
            .config
            .validation
            .clone()
            .with_captcha_token_required(captcha_state.is_enforced());
        let submission = validate_submission(&input.submission, &rules)?;
        self.advance(run, PipelineStage::Validated)?;
        self.log_sink.emit(
            LogRecord::new(LogLevel::Info, PIPELINE_TARGET, "submission_received").with_fields(
                serde_json::json!({
                    "emailDomain": submission.email().rsplit_once('@').map(|(_, d)| d),
                    "messageChars": submission.message().chars().count(),
                    "clientIp": client_ip,
                }),
            ),
        );

        // CaptchaChecked
        self.check_captcha(&submission, captcha_state, client_ip).await?;
        self.advance(run, PipelineStage::CaptchaChecked)?;

        // PolicyLoaded
        let policy = if classifier_state == ClassifierState::Active {
            let policy = self
                .policy_source
                .fetch_policy()
                .await
                .map_err(PipelineError::PolicyUnavailable)?;
            debug!(model = policy.model(), "Classification policy loaded");
            Some(policy)
        } else {
            info!(
                classifier = classifier_state.as_str(),
                "Spam classifier disabled by configuration; no policy loaded"
            );
            None
        };
        self.advance(run, PipelineStage::PolicyLoaded)?;

        // Classified
        let decision = match &policy {
            Some(policy) => {
                let decision = self.classify(&submission, policy).await?;
                if !decision.is_allowed() {
                    return Err(PipelineError::ClassifierRejected(decision));
                }
                Some(decision)
            }
            None => None,
        };
        self.advance(run, PipelineStage::Classified)?;

        // Dispatched
        let email = ContactEmail::from_submission(&submission);
        let receipt = self
            .dispatcher
            .send(&email)
            .await
            .map_err(|source| PipelineError::DispatchFailed {
                decision: decision.clone(),
                source,
            })?;
        self.advance(run, PipelineStage::Dispatched)?;

        Ok(Delivery {
            decision,
            receipt,
            captcha: captcha_state,
            classifier: classifier_state,
        })
    }

    fn advance(&self, run: &mut PipelineRun, to: PipelineStage) -> Result<(), PipelineError> {
        run.advance(to)?;
        debug!(stage = %to, "Pipeline stage reached");
        Ok(())
    }

    async fn check_captcha(
        &self,
        submission: &ValidSubmission,
        state: CaptchaState,
        client_ip: Option<&str>,
    ) -> Result<(), PipelineError> {
        if !state.is_enforced() {
            info!(state = %state, "Captcha verification not enforced for this request");
            return Ok(());
        }

        // Validation already required the token when enforced
        let token = submission.recaptcha_token().unwrap_or_default();
        let verdict = self
            .captcha
            .verify(token, client_ip)
            .await
            .map_err(PipelineError::CaptchaUnavailable)?;

        if verdict.is_accepted(self.config.min_captcha_score) {
            debug!(score = ?verdict.score, "Captcha accepted");
            Ok(())
        } else {
            Err(PipelineError::CaptchaFailed {
                score: verdict.score,
                error_codes: verdict.error_codes,
            })
        }
    }

    /// Ask the classifier about `submission` under `policy`.
    ///
    /// The submission goes in the user message as JSON, never as prose.
    pub async fn classify(
        &self,
        submission: &ValidSubmission,
        policy: &ClassificationPolicy,
    ) -> Result<ClassificationDecision, PipelineError> {
        let request = CompletionRequest::new(
            policy.model(),
            policy.system_prompt(),
            submission.to_classifier_json(),
        );

        let reply = self
            .gateway
            .complete(&request)
            .await
            .map_err(PipelineError::ClassifierUnavailable)?;

        debug!(reply = %truncate(&reply, 200), "Classifier replied");

        let decision = parse_classifier_reply(&reply)
            .into_decision()
            .map_err(|raw| PipelineError::ClassifierMalformed { raw })?;

        info!(
            decision = decision.verdict.as_str(),
            reason = decision.reason.as_deref().unwrap_or(""),
            "Submission classified"
        );
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_domain::{CaptchaVerdict, Verdict};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockCaptcha {
        result: Mutex<Option<Result<CaptchaVerdict, CaptchaError>>>,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl MockCaptcha {
        fn accepting() -> Self {
            Self::with(Ok(CaptchaVerdict {
                success: true,
                score: Some(0.9),
                error_codes: vec![],
            }))
        }

        fn with(result: Result<CaptchaVerdict, CaptchaError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CaptchaVerifier for MockCaptcha {
        async fn verify(
            &self,
            token: &str,
            client_ip: Option<&str>,
        ) -> Result<CaptchaVerdict, CaptchaError> {
            self.calls
                .lock()
                .unwrap()
                .push((token.to_string(), client_ip.map(str::to_string)));
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(CaptchaError::ConnectionError("no more results".into())))
        }
    }

    struct MockPolicy {
        fail: bool,
        calls: Mutex<usize>,
    }

    impl MockPolicy {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl PolicySource for MockPolicy {
        async fn fetch_policy(&self) -> Result<ClassificationPolicy, PolicyError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                Err(PolicyError::FetchFailed {
                    resource: "prompt",
                    reason: "HTTP 404".into(),
                })
            } else {
                Ok(ClassificationPolicy::try_new("test-model", "Classify it.").unwrap())
            }
        }
    }

    struct MockGateway {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockGateway {
        fn replying(reply: &str) -> Self {
            Self::with(Ok(reply.to_string()))
        }

        fn with(reply: Result<String, GatewayError>) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from([reply])),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionGateway for MockGateway {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(GatewayError::EmptyCompletion))
        }
    }

    struct MockDispatcher {
        fail: bool,
        sent: Mutex<Vec<ContactEmail>>,
    }

    impl MockDispatcher {
        fn ok() -> Self {
            Self {
                fail: false,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MailDispatcher for MockDispatcher {
        async fn send(&self, email: &ContactEmail) -> Result<DispatchReceipt, DispatchError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                Err(DispatchError::Rejected { status: 403 })
            } else {
                Ok(DispatchReceipt {
                    provider: "mock",
                    message_id: Some("msg-1".into()),
                })
            }
        }
    }

    #[derive(Default)]
    struct MemorySink {
        records: Mutex<Vec<LogRecord>>,
    }

    impl LogSink for MemorySink {
        fn emit(&self, record: LogRecord) {
            self.records.lock().unwrap().push(record);
        }
    }

    struct Harness {
        captcha: Arc<MockCaptcha>,
        policy: Arc<MockPolicy>,
        gateway: Arc<MockGateway>,
        dispatcher: Arc<MockDispatcher>,
        gate: Arc<CaptchaGate>,
        sink: Arc<MemorySink>,
        config: PipelineConfig,
    }

    impl Harness {
        fn new(gateway: MockGateway) -> Self {
            Self {
                captcha: Arc::new(MockCaptcha::accepting()),
                policy: Arc::new(MockPolicy::ok()),
                gateway: Arc::new(gateway),
                dispatcher: Arc::new(MockDispatcher::ok()),
                gate: Arc::new(CaptchaGate::new(false)),
                sink: Arc::new(MemorySink::default()),
                config: PipelineConfig::default(),
            }
        }

        fn use_case(&self) -> SubmitContactUseCase {
            SubmitContactUseCase::new(
                self.captcha.clone(),
                self.policy.clone(),
                self.gateway.clone(),
                self.dispatcher.clone(),
                self.gate.clone(),
                self.config.clone(),
            )
            .with_log_sink(self.sink.clone())
        }

        async fn submit(&self, submission: Submission) -> Result<Delivery, PipelineError> {
            self.use_case()
                .execute(SubmitContactInput::new(submission).with_client_ip("203.0.113.7"))
                .await
        }

        fn assert_no_external_calls(&self) {
            assert_eq!(self.captcha.call_count(), 0);
            assert_eq!(self.policy.call_count(), 0);
            assert_eq!(self.gateway.call_count(), 0);
            assert_eq!(self.dispatcher.sent_count(), 0);
        }
    }

    fn valid_submission() -> Submission {
        Submission::new("Bo", "bo@example.com", "I would like a quote for a website.")
    }

    // ==================== Validation ====================

    #[tokio::test]
    async fn test_missing_field_makes_no_external_call() {
        let h = Harness::new(MockGateway::replying("ALLOW"));
        h.gate.set_enabled(true);
        let err = h
            .submit(Submission::new("Bo", "", "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingField);
        assert_eq!(err.client_message(), "Missing required field: email");
        h.assert_no_external_calls();
    }

    #[tokio::test]
    async fn test_scenario_a_disposable_email() {
        let h = Harness::new(MockGateway::replying("ALLOW"));
        let err = h
            .submit(Submission::new("Bo", "bo@mailinator.com", "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidEmail);
        assert_eq!(err.code().status_class().http_status(), 400);
        h.assert_no_external_calls();
    }

    #[tokio::test]
    async fn test_scenario_b_message_too_long() {
        let h = Harness::new(MockGateway::replying("ALLOW"));
        let err = h
            .submit(Submission::new("Bo", "bo@example.com", "x".repeat(2001)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MessageTooLong);
        h.assert_no_external_calls();
    }

    #[tokio::test]
    async fn test_missing_token_when_captcha_enforced() {
        let h = Harness::new(MockGateway::replying("ALLOW"));
        h.gate.set_enabled(true);
        let err = h.submit(valid_submission()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingField);
        assert!(err.client_message().contains("recaptchaToken"));
        h.assert_no_external_calls();
    }

    // ==================== Captcha ====================

    #[tokio::test]
    async fn test_captcha_enforced_and_accepted() {
        let h = Harness::new(MockGateway::replying("ALLOW"));
        h.gate.set_enabled(true);
        let delivery = h
            .submit(valid_submission().with_recaptcha_token("tok"))
            .await
            .unwrap();
        assert_eq!(delivery.captcha, CaptchaState::Enforced);
        let calls = h.captcha.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("tok".to_string(), Some("203.0.113.7".to_string()))]);
    }

    #[tokio::test]
    async fn test_captcha_low_score_is_client_error() {
        let mut h = Harness::new(MockGateway::replying("ALLOW"));
        h.captcha = Arc::new(MockCaptcha::with(Ok(CaptchaVerdict {
            success: true,
            score: Some(0.1),
            error_codes: vec![],
        })));
        h.gate.set_enabled(true);
        let err = h
            .submit(valid_submission().with_recaptcha_token("tok"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CaptchaFailed);
        assert_eq!(err.code().status_class().http_status(), 400);
        assert_eq!(h.policy.call_count(), 0);
        assert_eq!(h.gateway.call_count(), 0);
        assert_eq!(h.dispatcher.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_captcha_outage_is_server_error() {
        let mut h = Harness::new(MockGateway::replying("ALLOW"));
        h.captcha = Arc::new(MockCaptcha::with(Err(CaptchaError::HttpStatus(503))));
        h.gate.set_enabled(true);
        let err = h
            .submit(valid_submission().with_recaptcha_token("tok"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CaptchaUnavailable);
        assert_eq!(err.code().status_class().http_status(), 500);
        assert_eq!(err.client_message(), "Captcha verification is unavailable");
        assert_eq!(h.dispatcher.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_captcha_disabled_by_flag_skips_verifier() {
        let h = Harness::new(MockGateway::replying("ALLOW"));
        let delivery = h.submit(valid_submission()).await.unwrap();
        assert_eq!(delivery.captcha, CaptchaState::DisabledByFlag);
        assert_eq!(h.captcha.call_count(), 0);
    }

    #[tokio::test]
    async fn test_captcha_lab_bypass() {
        let mut h = Harness::new(MockGateway::replying("ALLOW"));
        h.gate = Arc::new(CaptchaGate::new(true).with_lab_bypass(true));
        let delivery = h.submit(valid_submission()).await.unwrap();
        assert_eq!(delivery.captcha, CaptchaState::BypassedLab);
        assert_eq!(h.captcha.call_count(), 0);
    }

    // ==================== Policy ====================

    #[tokio::test]
    async fn test_policy_outage_is_server_error() {
        let mut h = Harness::new(MockGateway::replying("ALLOW"));
        h.policy = Arc::new(MockPolicy::failing());
        let err = h.submit(valid_submission()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PolicyUnavailable);
        assert_eq!(h.gateway.call_count(), 0);
        assert_eq!(h.dispatcher.sent_count(), 0);
    }

    // ==================== Classification ====================

    #[tokio::test]
    async fn test_classifier_request_shape() {
        let h = Harness::new(MockGateway::replying("ALLOW"));
        h.submit(valid_submission()).await.unwrap();
        let requests = h.gateway.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].system_prompt, "Classify it.");
        let user: serde_json::Value = serde_json::from_str(&requests[0].user_content).unwrap();
        assert_eq!(user["name"], "Bo");
        assert_eq!(user["email"], "bo@example.com");
        assert_eq!(user["message"], "I would like a quote for a website.");
    }

    #[tokio::test]
    async fn test_scenario_c_malformed_reply() {
        let h = Harness::new(MockGateway::replying("maybe?"));
        let err = h.submit(valid_submission()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ClassifierMalformed);
        assert_eq!(err.code().status_class().http_status(), 500);
        assert_eq!(h.dispatcher.sent_count(), 0);
        assert!(!err.client_message().contains("maybe"));
    }

    #[tokio::test]
    async fn test_scenario_d_deny() {
        let h = Harness::new(MockGateway::replying("DENY"));
        let err = h.submit(valid_submission()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ClassifierRejected);
        assert_eq!(err.code().status_class().http_status(), 422);
        assert_eq!(h.dispatcher.sent_count(), 0);

        let result = err.to_result();
        assert!(!result.success);
        assert!(!result.email_sent);
        assert_eq!(result.ai_decision, Some(Verdict::Deny));
    }

    #[tokio::test]
    async fn test_scenario_e_structured_allow() {
        let h = Harness::new(MockGateway::replying(
            r#"{"decision":"ALLOW","reason":"looks legitimate"}"#,
        ));
        let delivery = h.submit(valid_submission()).await.unwrap();
        let result = delivery.to_result();
        assert!(result.success);
        assert!(result.email_sent);
        assert_eq!(result.ai_decision, Some(Verdict::Allow));
        assert_eq!(result.ai_reason.as_deref(), Some("looks legitimate"));
        assert_eq!(h.dispatcher.sent_count(), 1);

        let sent = h.dispatcher.sent.lock().unwrap();
        assert_eq!(sent[0].reply_to, "bo@example.com");
    }

    #[tokio::test]
    async fn test_classifier_outage() {
        let h = Harness::new(MockGateway::with(Err(GatewayError::Timeout)));
        let err = h.submit(valid_submission()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ClassifierUnavailable);
        assert_eq!(h.dispatcher.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_classifier_disabled_skips_policy_and_model() {
        let mut h = Harness::new(MockGateway::replying("DENY"));
        h.config = PipelineConfig::default().with_classifier_enabled(false);
        let delivery = h.submit(valid_submission()).await.unwrap();
        assert!(delivery.decision.is_none());
        assert_eq!(delivery.classifier, ClassifierState::Disabled);
        assert_eq!(h.policy.call_count(), 0);
        assert_eq!(h.gateway.call_count(), 0);
        assert_eq!(h.dispatcher.sent_count(), 1);
    }

    // ==================== Dispatch ====================

    #[tokio::test]
    async fn test_dispatch_failure_keeps_allow_decision() {
        let mut h = Harness::new(MockGateway::replying("ALLOW"));
        h.dispatcher = Arc::new(MockDispatcher::failing());
        let err = h.submit(valid_submission()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DispatchFailed);

        let result = err.to_result();
        assert!(!result.success);
        assert!(!result.email_sent);
        assert_eq!(result.ai_decision, Some(Verdict::Allow));
        assert_eq!(result.status_class().http_status(), 500);
    }

    // ==================== Log sink ====================

    #[tokio::test]
    async fn test_log_sink_receives_pipeline_events() {
        let h = Harness::new(MockGateway::replying("ALLOW"));
        h.submit(valid_submission()).await.unwrap();
        let records = h.sink.records.lock().unwrap();
        let messages: Vec<_> = records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["submission_received", "submission_delivered"]);
        assert_eq!(records[0].fields["emailDomain"], "example.com");
        assert_eq!(records[1].fields["provider"], "mock");
    }

    #[tokio::test]
    async fn test_log_sink_records_rejection_stage() {
        let h = Harness::new(MockGateway::replying("DENY"));
        h.submit(valid_submission()).await.unwrap_err();
        let records = h.sink.records.lock().unwrap();
        let last = records.last().unwrap();
        assert_eq!(last.message, "submission_rejected");
        assert_eq!(last.fields["stage"], "policy_loaded");
        assert_eq!(last.fields["code"], "ClassifierRejected");
    }
}
