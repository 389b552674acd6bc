//! API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assign::{Assignment, Candidate, TaskRequirement};
use crate::plan::{GeneratedTaskPlanItem, ParseStage, PlanRequest};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Model used for plan generation
    pub model: String,
}

/// Request to auto-assign unassigned tasks across a roster.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(default)]
    pub tasks: Vec<TaskRequirement>,

    #[serde(default)]
    pub members: Vec<Candidate>,
}

/// Assignments chosen for the submitted tasks. Tasks with no eligible
/// member are left out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignResponse {
    pub assignments: Vec<Assignment>,
}

/// Request to generate a task plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    #[serde(flatten)]
    pub request: PlanRequest,

    /// Overrides the configured retry count
    pub max_retries: Option<u32>,

    /// Overrides the configured sampling temperature
    pub temperature: Option<f64>,
}

/// A generated plan, ready for the caller to review and store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    /// Identifier for this generation, for correlating logs
    pub plan_id: Uuid,

    pub tasks: Vec<GeneratedTaskPlanItem>,

    /// Model calls made, including the successful one
    pub attempts: u32,

    /// Pipeline step that produced the plan
    pub stage: ParseStage,

    pub generated_at: DateTime<Utc>,
}

/// Request for a workload summary over a roster.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadRequest {
    #[serde(default)]
    pub members: Vec<Candidate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_request_flattens_fields() {
        let parsed: CreatePlanRequest = serde_json::from_value(json!({
            "projectTitle": "MVP",
            "projectGoal": "Ship",
            "guidance": "Alice: react",
            "maxRetries": 1
        }))
        .unwrap();
        assert_eq!(parsed.request.project_title, "MVP");
        assert_eq!(parsed.request.guidance, "Alice: react");
        assert_eq!(parsed.max_retries, Some(1));
        assert_eq!(parsed.temperature, None);
    }

    #[test]
    fn assign_request_accepts_string_encoded_skills() {
        let parsed: AssignRequest = serde_json::from_value(json!({
            "tasks": [{"id": "t1", "title": "Build UI", "requiredSkills": "{\"react\": 0.9}"}],
            "members": [{"id": "u1", "name": "Alice", "skills": {"react": "0.8"}, "maxHours": 40, "assignedHours": 10}]
        }))
        .unwrap();
        assert_eq!(parsed.tasks[0].required_skills.get("react"), Some(0.9));
        assert_eq!(parsed.members[0].skills.get("react"), Some(0.8));
    }
}
