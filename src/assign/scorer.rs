//! Candidate scoring for a single task.
//!
//! # Formula
//! ```text
//! skill_match  = Σ resolve(candidate, k) * required[k]
//! load         = max_hours > 0 ? assigned / max_hours : 1.0
//! availability = (max_hours - assigned) > 0 ? 1.0 : 0.0
//! score        = 0.6 * skill_match + 0.2 * availability - 0.2 * load
//! ```
//!
//! # Pure Function
//! No side effects besides a debug trace, deterministic output.

use super::skills::SkillAliases;
use super::types::{Candidate, ScoredCandidate, TaskRequirement};

/// Weight of the skill match term.
pub const SKILL_WEIGHT: f64 = 0.6;
/// Weight of the availability term.
pub const AVAILABILITY_WEIGHT: f64 = 0.2;
/// Weight of the load penalty.
pub const LOAD_WEIGHT: f64 = 0.2;

/// Intermediate terms of a score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub skill_match: f64,
    pub availability: f64,
    pub load: f64,
    pub score: f64,
}

/// Scores candidates against tasks using a fixed alias table.
#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    aliases: SkillAliases,
}

impl CandidateScorer {
    pub fn new(aliases: SkillAliases) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &SkillAliases {
        &self.aliases
    }

    /// Weighted sum of resolved proficiency times required weight.
    ///
    /// An empty requirement map yields 0.
    pub fn skill_match(&self, task: &TaskRequirement, candidate: &Candidate) -> f64 {
        task.required_skills
            .iter()
            .map(|(key, required)| {
                self.aliases.resolve_proficiency(&candidate.skills, key) * required
            })
            .sum()
    }

    /// Compute every term of the score.
    pub fn breakdown(&self, task: &TaskRequirement, candidate: &Candidate) -> ScoreBreakdown {
        let skill_match = self.skill_match(task, candidate);
        let load = current_load(candidate);
        let availability = availability(candidate);
        let score = SKILL_WEIGHT * skill_match + AVAILABILITY_WEIGHT * availability
            - LOAD_WEIGHT * load;

        tracing::debug!(
            "Candidate {} for task {}: score={:.3} skill_match={:.3} load={:.2}",
            candidate.name,
            task.id,
            score,
            skill_match,
            load
        );

        ScoreBreakdown {
            skill_match,
            availability,
            load,
            score,
        }
    }

    /// Ranking score of `candidate` for `task`.
    pub fn score(&self, task: &TaskRequirement, candidate: &Candidate) -> f64 {
        self.breakdown(task, candidate).score
    }

    /// Score and package the result with the candidate's identity.
    pub fn score_candidate(&self, task: &TaskRequirement, candidate: &Candidate) -> ScoredCandidate {
        let b = self.breakdown(task, candidate);
        ScoredCandidate {
            candidate_id: candidate.id.clone(),
            candidate_name: candidate.name.clone(),
            score: b.score,
            skill_match: b.skill_match,
            availability: b.availability,
            load: b.load,
        }
    }
}

/// Fraction of capacity already used. Zero capacity counts as saturated.
pub fn current_load(candidate: &Candidate) -> f64 {
    if candidate.max_hours > 0.0 {
        candidate.assigned_hours / candidate.max_hours
    } else {
        1.0
    }
}

/// 1.0 while any capacity remains, else 0.0.
pub fn availability(candidate: &Candidate) -> f64 {
    if candidate.max_hours - candidate.assigned_hours > 0.0 {
        1.0
    } else {
        0.0
    }
}
