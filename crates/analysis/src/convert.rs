//! Unit to prompt-input conversion

use codescribe_core::{GraphContext, PromptInput, Unit};

/// Key under which the unit id is embedded in every prompt input; the round
/// executor correlates backend results back to units through it.
pub const UNIT_ID_KEY: &str = "moduleId";

/// Substituted for missing architecture notes so the template never renders
/// an empty slot.
pub const DEFAULT_ARCHITECTURE_NOTES: &str = "No architecture notes provided.";

/// Flattens a unit plus graph-level context into the string map consumed by
/// the prompt template. Pure and infallible; produced fresh each round.
pub fn unit_prompt_input(unit: &Unit, context: &GraphContext) -> PromptInput {
    let mut input = PromptInput::new();
    input.insert(UNIT_ID_KEY.to_string(), unit.id.clone());
    input.insert("moduleName".to_string(), unit.name.clone());
    input.insert("modulePath".to_string(), unit.path.clone());
    input.insert("purpose".to_string(), unit.purpose.clone());
    input.insert("keyFiles".to_string(), unit.key_files.join(", "));
    input.insert("dependencies".to_string(), join_or_none(&unit.dependencies));
    input.insert("dependents".to_string(), join_or_none(&unit.dependents));
    input.insert("complexity".to_string(), unit.complexity.to_string());
    input.insert("category".to_string(), unit.category.clone());
    input.insert("projectName".to_string(), context.project_name.clone());
    input.insert(
        "architectureNotes".to_string(),
        context
            .architecture_notes
            .clone()
            .unwrap_or_else(|| DEFAULT_ARCHITECTURE_NOTES.to_string()),
    );
    input
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
