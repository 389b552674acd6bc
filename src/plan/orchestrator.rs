//! Plan generation with bounded retries.
//!
//! Each attempt is one model call whose text goes through
//! extract, direct parse, repair, then bracket salvage. The first path that
//! produces a schema-valid plan wins. Failed attempts back off linearly
//! (`retry_base_delay * (attempt + 1)`) before the next call.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::PlanError;
use super::extract::{extract_json_text, outer_bracket_span};
use super::model::PlanModel;
use super::prompt::PlanPrompt;
use super::repair::repair;
use super::types::{GeneratedTaskPlanItem, PlanConfig, PlanRequest};
use super::validate::{describe_violations, parse_plan};

/// Which step of the text pipeline produced the accepted plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStage {
    Direct,
    Repaired,
    Salvaged,
}

/// A successful orchestration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub items: Vec<GeneratedTaskPlanItem>,
    /// Model calls made, including the successful one.
    pub attempts: u32,
    pub stage: ParseStage,
}

/// Why one response could not be turned into a plan.
#[derive(Debug, Clone)]
pub struct ResponseFailure {
    pub error: PlanError,
    pub parse_error: Option<String>,
    pub validation_error: Option<String>,
}

impl From<PlanError> for ResponseFailure {
    fn from(error: PlanError) -> Self {
        Self {
            error,
            parse_error: None,
            validation_error: None,
        }
    }
}

/// Turn one raw model response into a validated plan.
pub fn interpret_response(
    raw: &str,
) -> Result<(Vec<GeneratedTaskPlanItem>, ParseStage), ResponseFailure> {
    if raw.trim().is_empty() {
        return Err(PlanError::EmptyModelResponse.into());
    }

    let mut notes = Notes::default();

    let candidate = extract_json_text(raw).unwrap_or_else(|| raw.trim().to_string());
    if let Some(items) = notes.attempt(&candidate) {
        return Ok((items, ParseStage::Direct));
    }

    let repaired = repair(&candidate);
    if let Some(items) = notes.attempt(&repaired) {
        return Ok((items, ParseStage::Repaired));
    }

    if let Some(span) = outer_bracket_span(&repaired) {
        if span != repaired {
            if let Some(items) = notes.attempt(span) {
                return Ok((items, ParseStage::Salvaged));
            }
        }
    }

    Err(notes.into_failure())
}

/// Failure details accumulated across the pipeline steps of one response.
#[derive(Default)]
struct Notes {
    last: Option<PlanError>,
    parse_error: Option<String>,
    validation_error: Option<String>,
}

impl Notes {
    fn attempt(&mut self, text: &str) -> Option<Vec<GeneratedTaskPlanItem>> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                let message = e.to_string();
                self.parse_error = Some(message.clone());
                self.last = Some(PlanError::ParseFailure(message));
                return None;
            }
        };

        match parse_plan(&value) {
            Ok(items) => Some(items),
            Err(violations) => {
                self.validation_error = Some(describe_violations(&violations));
                self.last = Some(PlanError::SchemaViolation(violations));
                None
            }
        }
    }

    fn into_failure(self) -> ResponseFailure {
        ResponseFailure {
            error: self
                .last
                .unwrap_or_else(|| PlanError::ParseFailure("no JSON found".to_string())),
            parse_error: self.parse_error,
            validation_error: self.validation_error,
        }
    }
}

/// Drives plan generation against a [`PlanModel`].
pub struct PlanOrchestrator {
    model: Arc<dyn PlanModel>,
    config: PlanConfig,
}

impl PlanOrchestrator {
    pub fn new(model: Arc<dyn PlanModel>, config: PlanConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Generate a plan with no external cancellation.
    pub async fn generate(&self, request: &PlanRequest) -> Result<PlanOutcome, PlanError> {
        self.generate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Generate a plan, giving up early when `cancel` fires or the configured
    /// deadline passes.
    pub async fn generate_with_cancel(
        &self,
        request: &PlanRequest,
        cancel: &CancellationToken,
    ) -> Result<PlanOutcome, PlanError> {
        if request.is_blank() {
            return Err(PlanError::InvalidRequest(
                "project title or goal is required".to_string(),
            ));
        }

        let prompt = PlanPrompt::for_request(request);
        let deadline = self.config.deadline.map(|limit| Instant::now() + limit);
        let max_attempts = self.config.max_attempts();

        let mut last_error = None;
        let mut last_parse_error = None;
        let mut last_validation_error = None;

        for attempt in 0..max_attempts {
            let expired = deadline.is_some_and(|at| Instant::now() >= at);
            if cancel.is_cancelled() || expired {
                tracing::info!(attempts = attempt, "Plan generation cancelled");
                return Err(PlanError::Cancelled { attempts: attempt });
            }

            let call = self.model.generate(&prompt, self.config.temperature);
            let Some(response) = interruptible(cancel, deadline, call).await else {
                tracing::info!(attempts = attempt + 1, "Plan generation cancelled mid-call");
                return Err(PlanError::Cancelled {
                    attempts: attempt + 1,
                });
            };

            let result = match response {
                Ok(raw) => interpret_response(&raw),
                Err(e) => Err(PlanError::Model(format!("{:#}", e)).into()),
            };

            match result {
                Ok((items, stage)) => {
                    tracing::info!(
                        attempt = attempt + 1,
                        tasks = items.len(),
                        stage = ?stage,
                        "Plan generated"
                    );
                    return Ok(PlanOutcome {
                        items,
                        attempts: attempt + 1,
                        stage,
                    });
                }
                Err(failure) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        "Plan attempt failed: {}",
                        failure.error
                    );
                    if failure.parse_error.is_some() {
                        last_parse_error = failure.parse_error;
                    }
                    if failure.validation_error.is_some() {
                        last_validation_error = failure.validation_error;
                    }
                    last_error = Some(failure.error);
                }
            }

            if attempt + 1 < max_attempts {
                let delay = self.config.backoff(attempt);
                if interruptible(cancel, deadline, tokio::time::sleep(delay))
                    .await
                    .is_none()
                {
                    tracing::info!(attempts = attempt + 1, "Plan generation cancelled during backoff");
                    return Err(PlanError::Cancelled {
                        attempts: attempt + 1,
                    });
                }
            }
        }

        Err(PlanError::RetriesExhausted {
            attempts: max_attempts,
            last_error: Box::new(last_error.unwrap_or(PlanError::EmptyModelResponse)),
            last_parse_error,
            last_validation_error,
        })
    }
}

/// Run `fut` unless `cancel` fires or `deadline` passes first.
async fn interruptible<F: Future>(
    cancel: &CancellationToken,
    deadline: Option<Instant>,
    fut: F,
) -> Option<F::Output> {
    let expiry = async {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        _ = expiry => None,
        out = fut => Some(out),
    }
}
