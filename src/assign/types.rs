//! Candidate, requirement and assignment types.
//!
//! # Invariants
//! - All types are plain values; nothing here is mutated during a scoring pass.
//! - `SkillSet` only ever holds finite numeric proficiencies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mapping from skill key to a numeric level.
///
/// Used both for a candidate's proficiencies and for a task's required
/// weights. Built tolerantly from JSON: the tracker stores these maps as
/// JSON-encoded strings, so a string payload is parsed first. Values may be
/// numbers or numeric strings; anything else is dropped, which makes it
/// resolve to 0 at lookup time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct SkillSet(BTreeMap<String, f64>);

impl SkillSet {
    /// Create an empty skill set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a skill level.
    pub fn with(mut self, skill: impl Into<String>, level: f64) -> Self {
        if level.is_finite() {
            self.0.insert(skill.into(), level);
        }
        self
    }

    /// Parse a JSON-encoded skill map, returning the empty set on failure.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from(value),
            Err(e) => {
                tracing::warn!("Unparseable skill map, treating as empty: {}", e);
                Self::default()
            }
        }
    }

    /// Level stored under `key`, if present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(skill, level)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<Value> for SkillSet {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => SkillSet(
                map.into_iter()
                    .filter_map(|(k, v)| numeric_level(&v).map(|level| (k, level)))
                    .collect(),
            ),
            Value::String(raw) => SkillSet::from_json_str(&raw),
            Value::Null => SkillSet::default(),
            other => {
                tracing::warn!("Skill map is not an object ({}), treating as empty", kind_of(&other));
                SkillSet::default()
            }
        }
    }
}

impl FromIterator<(String, f64)> for SkillSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        SkillSet(iter.into_iter().filter(|(_, v)| v.is_finite()).collect())
    }
}

/// Numbers pass through; numeric strings are parsed; everything else is absent.
fn numeric_level(value: &Value) -> Option<f64> {
    let level = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    level.is_finite().then_some(level)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A team member who may receive a task.
///
/// `assigned_hours <= max_hours` is expected but not required; scoring
/// tolerates over-allocation and a zero capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub skills: SkillSet,
    #[serde(default)]
    pub max_hours: f64,
    #[serde(default)]
    pub assigned_hours: f64,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skills: SkillSet::new(),
            max_hours,
            assigned_hours: 0.0,
        }
    }

    pub fn with_skills(mut self, skills: SkillSet) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_assigned_hours(mut self, hours: f64) -> Self {
        self.assigned_hours = hours;
        self
    }
}

/// The part of a task the scorer reads.
///
/// An empty `required_skills` means any candidate is equally fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequirement {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required_skills: SkillSet,
}

impl TaskRequirement {
    pub fn new(id: impl Into<String>, title: impl Into<String>, required_skills: SkillSet) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            required_skills,
        }
    }
}

/// Score computed for one candidate against one task. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub candidate_id: String,
    pub candidate_name: String,
    pub score: f64,
    pub skill_match: f64,
    pub availability: f64,
    pub load: f64,
}

/// A task paired with the candidate chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub task_id: String,
    pub task_title: String,
    pub assignee_id: String,
    pub assignee_name: String,
    pub score: f64,
}
