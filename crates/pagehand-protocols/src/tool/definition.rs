//! Tool definition types.
//!
//! Every engine operation takes a flat object of named parameters, so the
//! parameter list is kept typed and rendered to JSON Schema only on export.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::types::RiskLevel;

/// Named parameters of one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Per-parameter JSON Schema keyed by name.
    pub properties: Map<String, Value>,

    /// Names that must be present.
    #[serde(default)]
    pub required: Vec<String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter the caller must supply.
    pub fn required(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self.required.push(name.to_string());
        self
    }

    /// Add a parameter the caller may omit.
    pub fn optional(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn has_required(&self) -> bool {
        !self.required.is_empty()
    }

    /// Object schema accepted by function-calling APIs.
    pub fn to_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }
}

/// Function-calling dialect a definition is exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    OpenAi,
    Anthropic,
}

/// Definition of one engine operation as offered to a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Operation id; this is the name the caller invokes.
    pub id: String,

    /// Display title.
    pub title: String,

    /// What the operation does, written for a language model.
    pub description: String,

    #[serde(default)]
    pub parameters: Parameters,

    #[serde(default)]
    pub risk_level: RiskLevel,
}

impl ToolDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            parameters: Parameters::default(),
            risk_level: RiskLevel::Low,
        }
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Description as exported. High-risk operations carry a warning so the
    /// model can ask before closing tabs.
    fn exported_description(&self) -> String {
        if self.risk_level >= RiskLevel::High {
            format!("{} This cannot be undone.", self.description)
        } else {
            self.description.clone()
        }
    }

    pub fn export(&self, format: ExportFormat) -> Value {
        let description = self.exported_description();
        let schema = self.parameters.to_schema();
        match format {
            ExportFormat::OpenAi => json!({
                "type": "function",
                "function": {
                    "name": self.id,
                    "description": description,
                    "parameters": schema,
                }
            }),
            ExportFormat::Anthropic => json!({
                "name": self.id,
                "description": description,
                "input_schema": schema,
            }),
        }
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
