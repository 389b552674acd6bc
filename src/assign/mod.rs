//! Assign module - picks the best team member for each task.
//!
//! # Key Concepts
//! - Skills: alias table bridging abstract requirements to concrete proficiencies
//! - Scorer: weighted skill match, availability and load for one candidate
//! - Selector: best candidate per task, first-seen wins ties
//! - Analytics: roster utilization summary
//!
//! Everything here is synchronous and pure over caller-supplied data.

mod analytics;
mod scorer;
mod selector;
mod skills;
mod types;

pub use analytics::{summarize_workload, MemberLoad, WorkloadSummary};
pub use scorer::{
    availability, current_load, CandidateScorer, ScoreBreakdown, AVAILABILITY_WEIGHT, LOAD_WEIGHT,
    SKILL_WEIGHT,
};
pub use selector::AssignmentSelector;
pub use skills::SkillAliases;
pub use types::{Assignment, Candidate, ScoredCandidate, SkillSet, TaskRequirement};
