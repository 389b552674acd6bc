//! Prompt construction for the planning model.

use super::types::PlanRequest;

/// Instruction sent as the system message on every attempt.
pub const SYSTEM_PROMPT: &str = r#"You are a project planner working inside a workflow tracker.

Your responsibilities:
- Read the project goal and the team capability description.
- Break the project into clean, well-structured tasks.
- Determine the skills each task requires, as proficiency weights from 0.0 to 1.0.
- Suggest an ideal assignee only from team members named in the description.

Output rules:
- Respond with a JSON array only, inside a ```json code block.
- Each task has exactly these fields: title (string), description (string),
  estimatedHours (number), requiredSkills (object of skill name to number),
  and optionally idealAssigneeName (string).
- Do not add any other fields, commentary, or text outside the code block."#;

/// A rendered prompt: system instruction plus user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanPrompt {
    pub system: String,
    pub user: String,
}

impl PlanPrompt {
    /// Render the prompt for `request`.
    pub fn for_request(request: &PlanRequest) -> Self {
        let guidance = if request.guidance.trim().is_empty() {
            "(none provided)"
        } else {
            request.guidance.trim()
        };

        let user = format!(
            r#"Generate a task breakdown for this project.

Project Title: "{}"
Goal: "{}"
Team Skills / Capabilities: "{}"

Follow this shape for every task:

{{
  "title": "Task Title",
  "description": "Detailed explanation",
  "estimatedHours": 8,
  "requiredSkills": {{ "skillName": 0.8 }},
  "idealAssigneeName": "Alice"
}}

Now generate the JSON array."#,
            request.project_title.trim(),
            request.project_goal.trim(),
            guidance
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
