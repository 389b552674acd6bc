//! Plan generation errors.

use super::validate::{describe_violations, Violation};

/// Errors from plan generation.
///
/// Per-attempt failures (`EmptyModelResponse`, `ParseFailure`,
/// `SchemaViolation`, `Model`) are retried; the caller only ever sees
/// `InvalidRequest`, `RetriesExhausted` or `Cancelled`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    #[error("Invalid plan request: {0}")]
    InvalidRequest(String),

    #[error("Model returned an empty response")]
    EmptyModelResponse,

    #[error("Could not parse model response: {0}")]
    ParseFailure(String),

    #[error("Plan failed schema validation: {}", describe_violations(.0))]
    SchemaViolation(Vec<Violation>),

    #[error("Model call failed: {0}")]
    Model(String),

    #[error(
        "Plan generation failed after {attempts} attempts: {last_error} (last parse error: {}; last validation error: {})",
        .last_parse_error.as_deref().unwrap_or("none"),
        .last_validation_error.as_deref().unwrap_or("none")
    )]
    RetriesExhausted {
        attempts: u32,
        last_error: Box<PlanError>,
        last_parse_error: Option<String>,
        last_validation_error: Option<String>,
    },

    #[error("Plan generation cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}
