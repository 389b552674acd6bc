//! Schema validation for generated task plans.
//!
//! # Schema
//! ```text
//! [ { title: string, description: string, estimatedHours: number,
//!     requiredSkills: { <skill>: number, ... },
//!     idealAssigneeName?: string } ]
//! ```
//! No other fields are allowed. All violations are collected; validation
//! never stops at the first one.

use serde::Serialize;
use serde_json::{Map, Value};

use super::types::GeneratedTaskPlanItem;

const REQUIRED_STRINGS: [&str; 2] = ["title", "description"];
const ALLOWED_FIELDS: [&str; 5] = [
    "title",
    "description",
    "estimatedHours",
    "requiredSkills",
    "idealAssigneeName",
];

/// One schema rule broken at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON-pointer style location, `/` for the root.
    pub path: String,
    /// The rule that was broken.
    pub rule: String,
}

impl Violation {
    fn new(path: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rule: rule.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.path, self.rule)
    }
}

/// Check `value` against the plan schema.
pub fn validate_plan(value: &Value) -> Result<(), Vec<Violation>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(vec![Violation::new(
                "/",
                format!("must be an array, found {}", type_name(other)),
            )])
        }
    };

    let mut violations = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let path = format!("/{}", index);
        match item {
            Value::Object(fields) => check_item(&path, fields, &mut violations),
            other => violations.push(Violation::new(
                path,
                format!("must be an object, found {}", type_name(other)),
            )),
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate, then convert into typed plan items.
pub fn parse_plan(value: &Value) -> Result<Vec<GeneratedTaskPlanItem>, Vec<Violation>> {
    validate_plan(value)?;
    serde_json::from_value(value.clone())
        .map_err(|e| vec![Violation::new("/", format!("could not be decoded: {}", e))])
}

/// Join violations into a single line for error messages.
pub fn describe_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_item(path: &str, fields: &Map<String, Value>, out: &mut Vec<Violation>) {
    for name in REQUIRED_STRINGS {
        match fields.get(name) {
            None => out.push(Violation::new(format!("{path}/{name}"), "is required")),
            Some(Value::String(_)) => {}
            Some(other) => out.push(Violation::new(
                format!("{path}/{name}"),
                format!("must be a string, found {}", type_name(other)),
            )),
        }
    }

    match fields.get("estimatedHours") {
        None => out.push(Violation::new(format!("{path}/estimatedHours"), "is required")),
        Some(Value::Number(_)) => {}
        Some(other) => out.push(Violation::new(
            format!("{path}/estimatedHours"),
            format!("must be a number, found {}", type_name(other)),
        )),
    }

    match fields.get("requiredSkills") {
        None => out.push(Violation::new(format!("{path}/requiredSkills"), "is required")),
        Some(Value::Object(skills)) => {
            for (skill, level) in skills {
                if !level.is_number() {
                    out.push(Violation::new(
                        format!("{path}/requiredSkills/{}", escape_pointer(skill)),
                        format!("must be a number, found {}", type_name(level)),
                    ));
                }
            }
        }
        Some(other) => out.push(Violation::new(
            format!("{path}/requiredSkills"),
            format!("must be an object, found {}", type_name(other)),
        )),
    }

    match fields.get("idealAssigneeName") {
        None | Some(Value::String(_)) => {}
        Some(other) => out.push(Violation::new(
            format!("{path}/idealAssigneeName"),
            format!("must be a string, found {}", type_name(other)),
        )),
    }

    for name in fields.keys() {
        if !ALLOWED_FIELDS.contains(&name.as_str()) {
            out.push(Violation::new(
                format!("{path}/{}", escape_pointer(name)),
                "is not an allowed property",
            ));
        }
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_item() -> Value {
        json!({
            "title": "Setup React App",
            "description": "Initialize the app with Vite",
            "estimatedHours": 8,
            "requiredSkills": {"react": 0.8},
            "idealAssigneeName": "Alice"
        })
    }

    #[test]
    fn accepts_valid_plan() {
        assert!(validate_plan(&json!([valid_item()])).is_ok());
        assert!(validate_plan(&json!([])).is_ok());
    }

    #[test]
    fn assignee_is_optional() {
        let mut item = valid_item();
        item.as_object_mut().unwrap().remove("idealAssigneeName");
        assert!(validate_plan(&json!([item])).is_ok());
    }

    #[test]
    fn missing_estimated_hours_names_element_path() {
        let mut item = valid_item();
        item.as_object_mut().unwrap().remove("estimatedHours");
        let violations = validate_plan(&json!([valid_item(), item])).unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "/1/estimatedHours");
        assert_eq!(violations[0].rule, "is required");
    }

    #[test]
    fn root_must_be_array() {
        let violations = validate_plan(&valid_item()).unwrap_err();
        assert_eq!(violations[0].path, "/");
    }

    #[test]
    fn collects_every_violation() {
        let plan = json!([
            {"title": 3, "estimatedHours": "four", "requiredSkills": {"node": "high"}, "priority": "low"},
            "not an object"
        ]);
        let violations = validate_plan(&plan).unwrap_err();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();

        assert!(paths.contains(&"/0/title"));
        assert!(paths.contains(&"/0/description"));
        assert!(paths.contains(&"/0/estimatedHours"));
        assert!(paths.contains(&"/0/requiredSkills/node"));
        assert!(paths.contains(&"/0/priority"));
        assert!(paths.contains(&"/1"));
        assert_eq!(violations.len(), 6);
    }

    #[test]
    fn parse_plan_yields_typed_items() {
        let items = parse_plan(&json!([valid_item()])).unwrap();
        assert_eq!(items[0].title, "Setup React App");
        assert_eq!(items[0].required_skills.get("react"), Some(&0.8));
    }

    #[test]
    fn violations_render_on_one_line() {
        let violations = validate_plan(&json!([{}])).unwrap_err();
        let text = describe_violations(&violations);
        assert!(text.contains("/0/title is required"));
        assert!(text.contains("; "));
    }
}
