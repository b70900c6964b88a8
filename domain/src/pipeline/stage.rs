//! Pipeline state machine.
//!
//! ```text
//! Received → Validated → CaptchaChecked → PolicyLoaded → Classified → Dispatched → Responded
//!     └──────────┴─────────────┴──────────────┴─────────────┴──→ Rejected(code)
//! ```
//!
//! Stages advance strictly one at a time. A disabled stage (captcha off,
//! classifier off) is still entered; the orchestrator records why it did
//! nothing. Once rejected or responded, the run accepts no further
//! transitions.

use super::result::ErrorCode;
use serde::Serialize;
use thiserror::Error;

/// A stage of the contact pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Received,
    Validated,
    CaptchaChecked,
    PolicyLoaded,
    Classified,
    Dispatched,
    Responded,
}

impl PipelineStage {
    /// The stage that follows this one, if any.
    pub fn next(&self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Received => Some(PipelineStage::Validated),
            PipelineStage::Validated => Some(PipelineStage::CaptchaChecked),
            PipelineStage::CaptchaChecked => Some(PipelineStage::PolicyLoaded),
            PipelineStage::PolicyLoaded => Some(PipelineStage::Classified),
            PipelineStage::Classified => Some(PipelineStage::Dispatched),
            PipelineStage::Dispatched => Some(PipelineStage::Responded),
            PipelineStage::Responded => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Validated => "validated",
            PipelineStage::CaptchaChecked => "captcha_checked",
            PipelineStage::PolicyLoaded => "policy_loaded",
            PipelineStage::Classified => "classified",
            PipelineStage::Dispatched => "dispatched",
            PipelineStage::Responded => "responded",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalid transition on a [`PipelineRun`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageTransitionError {
    #[error("Cannot move from {from} to {to}")]
    OutOfOrder {
        from: PipelineStage,
        to: PipelineStage,
    },

    #[error("Pipeline already finished at {0}")]
    AlreadyTerminal(PipelineStage),
}

/// Progress of one request through the pipeline (Entity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    stage: PipelineStage,
    rejection: Option<ErrorCode>,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRun {
    pub fn new() -> Self {
        Self {
            stage: PipelineStage::Received,
            rejection: None,
        }
    }

    /// Last stage reached.
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// The rejection code, if the run ended in `Rejected`.
    pub fn rejection(&self) -> Option<ErrorCode> {
        self.rejection
    }

    pub fn is_terminal(&self) -> bool {
        self.rejection.is_some() || self.stage == PipelineStage::Responded
    }

    /// Move to `to`, which must be the immediate successor of the current stage.
    ///
    /// `Responded` is reachable only through [`respond`](Self::respond).
    pub fn advance(&mut self, to: PipelineStage) -> Result<(), StageTransitionError> {
        self.ensure_open()?;
        if to == PipelineStage::Responded || self.stage.next() != Some(to) {
            return Err(StageTransitionError::OutOfOrder {
                from: self.stage,
                to,
            });
        }
        self.stage = to;
        Ok(())
    }

    /// End the run in `Rejected(code)` at the current stage.
    pub fn reject(&mut self, code: ErrorCode) -> Result<(), StageTransitionError> {
        self.ensure_open()?;
        self.rejection = Some(code);
        Ok(())
    }

    /// End the run in `Responded`.
    ///
    /// Allowed after dispatch, or after classification when the dispatch
    /// attempt itself failed.
    pub fn respond(&mut self) -> Result<(), StageTransitionError> {
        self.ensure_open()?;
        match self.stage {
            PipelineStage::Classified | PipelineStage::Dispatched => {
                self.stage = PipelineStage::Responded;
                Ok(())
            }
            from => Err(StageTransitionError::OutOfOrder {
                from,
                to: PipelineStage::Responded,
            }),
        }
    }

    fn ensure_open(&self) -> Result<(), StageTransitionError> {
        if self.is_terminal() {
            Err(StageTransitionError::AlreadyTerminal(self.stage))
        } else {
            Ok(())
        }
    }
}
