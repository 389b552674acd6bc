//! Best-assignee selection.
//!
//! # Algorithm
//! 1. Score every candidate for the task
//! 2. Keep the running maximum, replacing it only on a strictly higher score
//! 3. Return the winner, or `None` for an empty roster
//!
//! Batches run the same selection independently per task, in task order.
//! There is no global matching: one strong candidate may win several tasks.

use super::scorer::CandidateScorer;
use super::types::{Assignment, Candidate, ScoredCandidate, TaskRequirement};

/// Picks a winner per task from a roster.
#[derive(Debug, Clone, Default)]
pub struct AssignmentSelector {
    scorer: CandidateScorer,
}

impl AssignmentSelector {
    pub fn new(scorer: CandidateScorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &CandidateScorer {
        &self.scorer
    }

    /// Highest-scoring candidate for `task`.
    ///
    /// Ties keep the candidate seen first.
    pub fn select_best(
        &self,
        task: &TaskRequirement,
        candidates: &[Candidate],
    ) -> Option<ScoredCandidate> {
        let mut best: Option<ScoredCandidate> = None;
        for candidate in candidates {
            let scored = self.scorer.score_candidate(task, candidate);
            let better = best.as_ref().map_or(true, |b| scored.score > b.score);
            if better {
                best = Some(scored);
            }
        }
        best
    }

    /// Assign every task independently. Tasks with no winner are omitted.
    pub fn assign_all(&self, tasks: &[TaskRequirement], candidates: &[Candidate]) -> Vec<Assignment> {
        let assignments: Vec<Assignment> = tasks
            .iter()
            .filter_map(|task| {
                let winner = self.select_best(task, candidates)?;
                tracing::info!(
                    "Assigned task {} to {} (score {:.3})",
                    task.id,
                    winner.candidate_name,
                    winner.score
                );
                Some(Assignment {
                    task_id: task.id.clone(),
                    task_title: task.title.clone(),
                    assignee_id: winner.candidate_id,
                    assignee_name: winner.candidate_name,
                    score: winner.score,
                })
            })
            .collect();

        if assignments.len() < tasks.len() {
            tracing::warn!(
                "{} of {} tasks had no eligible candidate",
                tasks.len() - assignments.len(),
                tasks.len()
            );
        }
        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::SkillSet;

    fn react_task(id: &str) -> TaskRequirement {
        TaskRequirement::new(id, format!("Task {id}"), SkillSet::new().with("react", 1.0))
    }

    #[test]
    fn picks_highest_scoring_candidate() {
        let selector = AssignmentSelector::default();
        let candidates = vec![
            Candidate::new("b", "B", 40.0).with_skills(SkillSet::new().with("react", 0.2)),
            Candidate::new("a", "A", 40.0).with_skills(SkillSet::new().with("react", 0.9)),
        ];

        let best = selector.select_best(&react_task("t"), &candidates).unwrap();
        assert_eq!(best.candidate_id, "a");
        assert!((best.score - 0.74).abs() < 1e-9);
    }

    #[test]
    fn tie_goes_to_first_seen() {
        let selector = AssignmentSelector::default();
        let skills = SkillSet::new().with("react", 0.5);
        let candidates = vec![
            Candidate::new("first", "First", 40.0).with_skills(skills.clone()),
            Candidate::new("second", "Second", 40.0).with_skills(skills),
        ];

        let best = selector.select_best(&react_task("t"), &candidates).unwrap();
        assert_eq!(best.candidate_id, "first");
    }

    #[test]
    fn empty_roster_selects_nobody() {
        let selector = AssignmentSelector::default();
        assert!(selector.select_best(&react_task("t"), &[]).is_none());
        assert!(selector.assign_all(&[react_task("t")], &[]).is_empty());
    }

    #[test]
    fn negative_scores_still_produce_a_winner() {
        let selector = AssignmentSelector::default();
        let candidates = vec![Candidate::new("x", "Saturated", 0.0)];

        let best = selector.select_best(&react_task("t"), &candidates).unwrap();
        assert_eq!(best.candidate_id, "x");
        assert!(best.score < 0.0);
    }

    #[test]
    fn empty_requirements_rank_by_capacity() {
        let selector = AssignmentSelector::default();
        let task = TaskRequirement::new("t", "Anything", SkillSet::new());
        let candidates = vec![
            Candidate::new("busy", "Busy", 40.0).with_assigned_hours(30.0),
            Candidate::new("free", "Free", 40.0),
        ];

        let best = selector.select_best(&task, &candidates).unwrap();
        assert_eq!(best.candidate_id, "free");
    }

    #[test]
    fn batch_assigns_independently_in_task_order() {
        let selector = AssignmentSelector::default();
        let candidates = vec![
            Candidate::new("a", "A", 40.0).with_skills(SkillSet::new().with("react", 0.9)),
            Candidate::new("b", "B", 40.0).with_skills(SkillSet::new().with("react", 0.2)),
        ];
        let tasks = vec![react_task("t1"), react_task("t2")];

        let assignments = selector.assign_all(&tasks, &candidates);
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].task_id, "t1");
        assert_eq!(assignments[1].task_id, "t2");
        // Same winner twice: no double-booking guard.
        assert!(assignments.iter().all(|a| a.assignee_id == "a"));
    }

    #[test]
    fn unparseable_requirements_do_not_abort_batch() {
        let selector = AssignmentSelector::default();
        let broken = TaskRequirement::new("t1", "Broken", SkillSet::from_json_str("{oops"));
        let candidates = vec![Candidate::new("a", "A", 40.0)];

        let assignments = selector.assign_all(&[broken, react_task("t2")], &candidates);
        assert_eq!(assignments.len(), 2);
        assert!((assignments[0].score - 0.2).abs() < 1e-12);
    }
}
