//! Skill alias table and proficiency lookup.
//!
//! Tasks describe what they need in abstract terms ("design", "testing"),
//! while members record concrete proficiencies ("react", "node"). The alias
//! table bridges the two. Keys without an alias are looked up verbatim.

use std::collections::HashMap;

use super::types::SkillSet;

/// Immutable mapping from abstract requirement key to concrete skill key.
///
/// Built once at startup and passed to the scorer explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillAliases {
    aliases: HashMap<String, String>,
}

impl SkillAliases {
    /// Create a table from `(requirement_key, skill_key)` pairs.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// A table with no aliases; every key is used verbatim.
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// The candidate-skill key to use for `requirement_key`.
    pub fn lookup_key<'a>(&'a self, requirement_key: &'a str) -> &'a str {
        self.aliases
            .get(requirement_key)
            .map(String::as_str)
            .unwrap_or(requirement_key)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Proficiency a candidate has for an abstract requirement key.
    ///
    /// Missing entries resolve to 0.
    pub fn resolve_proficiency(&self, candidate_skills: &SkillSet, requirement_key: &str) -> f64 {
        candidate_skills
            .get(self.lookup_key(requirement_key))
            .unwrap_or(0.0)
    }
}

impl Default for SkillAliases {
    /// The tracker's standard table.
    fn default() -> Self {
        Self::new([
            ("analysis", "node"),
            ("documentation", "react"),
            ("design", "react"),
            ("ui_ux", "react"),
            ("development", "node"),
            ("testing", "node"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_remaps_requirement_key() {
        let aliases = SkillAliases::default();
        let skills = SkillSet::new().with("react", 0.8).with("node", 0.3);

        assert_eq!(aliases.resolve_proficiency(&skills, "documentation"), 0.8);
        assert_eq!(aliases.resolve_proficiency(&skills, "testing"), 0.3);
    }

    #[test]
    fn unaliased_key_is_used_verbatim() {
        let aliases = SkillAliases::default();
        let skills = SkillSet::new().with("react", 0.9);

        assert_eq!(aliases.lookup_key("react"), "react");
        assert_eq!(aliases.resolve_proficiency(&skills, "react"), 0.9);
    }

    #[test]
    fn missing_skill_resolves_to_zero() {
        let aliases = SkillAliases::default();
        let skills = SkillSet::new().with("frontend", 0.9);

        assert_eq!(aliases.resolve_proficiency(&skills, "design"), 0.0);
        assert_eq!(aliases.resolve_proficiency(&skills, "cobol"), 0.0);
    }

    #[test]
    fn empty_table_never_remaps() {
        let aliases = SkillAliases::empty();
        assert!(aliases.is_empty());
        assert_eq!(aliases.lookup_key("design"), "design");
    }
}
