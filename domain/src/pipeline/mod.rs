//! Contact pipeline progress and response payload.
//!
//! - [`stage::PipelineRun`]: forward-only state machine over [`stage::PipelineStage`]
//! - [`result::PipelineResult`]: the single response produced per request

pub mod result;
pub mod stage;
