//! Roster workload summary.

use serde::Serialize;

use super::scorer::current_load;
use super::types::Candidate;

/// Aggregate utilization for a roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSummary {
    pub total_members: usize,
    pub total_assigned_hours: f64,
    pub total_max_hours: f64,
    /// Assigned over capacity across the whole roster; 0 when there is no capacity.
    pub avg_utilization: f64,
    /// Members at or above full capacity.
    pub saturated_members: usize,
    pub members: Vec<MemberLoad>,
}

/// Per-member load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLoad {
    pub id: String,
    pub name: String,
    pub assigned_hours: f64,
    pub max_hours: f64,
    pub load: f64,
}

/// Summarize how loaded a roster is.
pub fn summarize_workload(candidates: &[Candidate]) -> WorkloadSummary {
    let total_assigned_hours: f64 = candidates.iter().map(|c| c.assigned_hours).sum();
    let total_max_hours: f64 = candidates.iter().map(|c| c.max_hours).sum();
    let avg_utilization = if total_max_hours > 0.0 {
        total_assigned_hours / total_max_hours
    } else {
        0.0
    };

    let members: Vec<MemberLoad> = candidates
        .iter()
        .map(|c| MemberLoad {
            id: c.id.clone(),
            name: c.name.clone(),
            assigned_hours: c.assigned_hours,
            max_hours: c.max_hours,
            load: current_load(c),
        })
        .collect();

    WorkloadSummary {
        total_members: candidates.len(),
        total_assigned_hours,
        total_max_hours,
        avg_utilization,
        saturated_members: members.iter().filter(|m| m.load >= 1.0).count(),
        members,
    }
}
