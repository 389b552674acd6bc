//! AI plan ingestion.
//!
//! Turns a project title, goal and free-text guidance into a validated list of
//! [`GeneratedTaskPlanItem`]s. Model output is treated as untrusted text:
//!
//! ```text
//! PlanModel ──raw──▶ extract ──▶ parse ──▶ validate ──▶ items
//!                               │  fail
//!                               ▼
//!                             repair ──▶ parse ──▶ validate
//!                               │  fail
//!                               ▼
//!                        salvage [...] ──▶ parse ──▶ validate
//! ```
//!
//! If every path fails the attempt fails and the orchestrator retries with
//! linear backoff until attempts run out.

mod error;
mod extract;
mod model;
mod orchestrator;
mod prompt;
mod repair;
mod types;
mod validate;

pub use error::PlanError;
pub use extract::{extract_json_text, outer_bracket_span};
pub use model::{LlmPlanModel, PlanModel};
pub use orchestrator::{interpret_response, ParseStage, PlanOrchestrator, PlanOutcome, ResponseFailure};
pub use prompt::{PlanPrompt, SYSTEM_PROMPT};
pub use repair::repair;
pub use types::{GeneratedTaskPlanItem, PlanConfig, PlanRequest, MAX_RETRIES_LIMIT};
pub use validate::{describe_violations, parse_plan, validate_plan, Violation};
