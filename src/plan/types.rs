//! Plan request, configuration and generated item types.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One AI-proposed task, before the caller accepts and stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratedTaskPlanItem {
    pub title: String,
    pub description: String,
    pub estimated_hours: f64,
    /// Skill name to required proficiency (0.0 - 1.0).
    pub required_skills: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_assignee_name: Option<String>,
}

/// What to plan.
///
/// Missing fields deserialize as empty so blank requests are rejected by
/// [`PlanRequest::is_blank`] rather than by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanRequest {
    pub project_title: String,
    pub project_goal: String,
    /// Free-text guidance from the user, typically team capabilities.
    pub guidance: String,
}

impl PlanRequest {
    pub fn new(
        project_title: impl Into<String>,
        project_goal: impl Into<String>,
        guidance: impl Into<String>,
    ) -> Self {
        Self {
            project_title: project_title.into(),
            project_goal: project_goal.into(),
            guidance: guidance.into(),
        }
    }

    /// A request needs at least a title or a goal to plan against.
    pub fn is_blank(&self) -> bool {
        self.project_title.trim().is_empty() && self.project_goal.trim().is_empty()
    }
}

/// Highest `max_retries` accepted from configuration or a request.
pub const MAX_RETRIES_LIMIT: u32 = 5;

/// Retry and sampling settings for plan generation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanConfig {
    /// Retries after the first attempt. Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Sampling temperature passed to the model.
    pub temperature: f64,
    /// Backoff unit; attempt `n` (0-based) waits `retry_base_delay * (n + 1)`.
    pub retry_base_delay: Duration,
    /// Overall deadline for one orchestration, if any.
    pub deadline: Option<Duration>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            temperature: 0.2,
            retry_base_delay: Duration::from_millis(500),
            deadline: None,
        }
    }
}

impl PlanConfig {
    /// Total number of model calls allowed.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after failed attempt `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay.saturating_mul(attempt.saturating_add(1))
    }
}
