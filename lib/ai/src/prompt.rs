//! Prompt templates.
//!
//! Templates use `{{variable_name}}` placeholders. Substitution is a single
//! left-to-right pass, so text supplied by a caller is never re-expanded even
//! if it happens to contain a placeholder.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::warn;

/// Definition of a template variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Description of what this variable is for.
    pub description: String,
    /// Whether rendering without this variable is a caller bug.
    pub required: bool,
}

impl VariableDefinition {
    /// Creates a required variable definition.
    #[must_use]
    pub fn required(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            required: true,
        }
    }
}

/// A named instruction template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template name, used in logs.
    pub name: String,
    /// Template content with placeholders.
    pub content: String,
    /// Variable definitions (name -> definition).
    pub variables: HashMap<String, VariableDefinition>,
}

impl PromptTemplate {
    /// Creates a new prompt template.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            variables: HashMap::new(),
        }
    }

    /// Adds a variable definition.
    #[must_use]
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        definition: VariableDefinition,
    ) -> Self {
        self.variables.insert(name.into(), definition);
        self
    }

    /// Renders the template with the given variables.
    ///
    /// Placeholders without a value are left in place, and a warning names
    /// any required variable that was not supplied.
    #[must_use]
    pub fn render(&self, variables: &HashMap<String, JsonValue>) -> String {
        let missing = self.missing_variables(variables);
        if !missing.is_empty() {
            warn!(template = %self.name, ?missing, "Rendering prompt without required variables");
        }

        let mut rendered = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(open) = rest.find("{{") {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                rendered.push_str(&rest[open..]);
                return rendered;
            };

            match variables.get(after[..close].trim()) {
                Some(JsonValue::String(s)) => rendered.push_str(s),
                Some(other) => rendered.push_str(&other.to_string()),
                None => rendered.push_str(&rest[open..open + close + 4]),
            }
            rest = &after[close + 2..];
        }

        rendered.push_str(rest);
        rendered
    }

    /// Required variables absent from `variables`, sorted.
    #[must_use]
    pub fn missing_variables(&self, variables: &HashMap<String, JsonValue>) -> Vec<String> {
        let mut missing: Vec<String> = self
            .variables
            .iter()
            .filter(|(name, def)| def.required && !variables.contains_key(*name))
            .map(|(name, _)| name.clone())
            .collect();
        missing.sort();
        missing
    }
}
