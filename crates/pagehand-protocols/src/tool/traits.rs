//! Tool trait definition.

use async_trait::async_trait;

use super::{ToolContext, ToolDefinition, ToolResult};
use crate::error::ToolError;
use crate::types::RiskLevel;

/// Core trait for tools.
///
/// A tool deserializes its JSON parameters, performs one engine operation
/// and reports the operation's envelope as a [`ToolResult`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition.
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError>;

    /// Validate the parameters before execution.
    ///
    /// Absent parameters (`null`) are accepted for tools with no required
    /// parameters.
    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        let parameters = &self.definition().parameters;
        match params {
            serde_json::Value::Object(map) => {
                match parameters.required.iter().find(|name| !map.contains_key(*name)) {
                    Some(missing) => Err(ToolError::ValidationFailed(format!(
                        "Missing required parameter '{missing}'"
                    ))),
                    None => Ok(()),
                }
            }
            serde_json::Value::Null if !parameters.has_required() => Ok(()),
            _ => Err(ToolError::ValidationFailed(
                "Parameters must be an object".to_string(),
            )),
        }
    }

    /// Returns the risk level of this tool.
    fn risk_level(&self) -> RiskLevel {
        self.definition().risk_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::Parameters;

    struct EchoTool {
        definition: ToolDefinition,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("echo", "Echo", "Echoes its parameters"),
            }
        }

        fn with_parameters(parameters: Parameters) -> Self {
            Self {
                definition: ToolDefinition::new("echo", "Echo", "Echoes its parameters")
                    .with_parameters(parameters),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success_json("echo", params))
        }
    }

    fn node_id_required() -> Parameters {
        Parameters::new().required("nodeId", serde_json::json!({"type": "integer"}))
    }

    #[test]
    fn test_validate_accepts_object() {
        let tool = EchoTool::new();
        assert!(tool.validate(&serde_json::json!({"nodeId": 1})).is_ok());
    }

    #[test]
    fn test_validate_rejects_array() {
        let tool = EchoTool::new();
        let err = tool.validate(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, ToolError::ValidationFailed(msg) if msg.contains("object")));
    }

    #[test]
    fn test_validate_null_without_required_fields() {
        let tool = EchoTool::with_parameters(
            Parameters::new().optional("tabIndex", serde_json::json!({"type": "integer"})),
        );
        assert!(tool.validate(&serde_json::Value::Null).is_ok());
    }

    #[test]
    fn test_validate_null_with_required_fields() {
        let tool = EchoTool::with_parameters(node_id_required());
        assert!(tool.validate(&serde_json::Value::Null).is_err());
    }

    #[test]
    fn test_validate_names_missing_required_field() {
        let tool = EchoTool::with_parameters(node_id_required());
        let err = tool.validate(&serde_json::json!({"text": "hi"})).unwrap_err();
        assert!(matches!(err, ToolError::ValidationFailed(msg) if msg.contains("nodeId")));
    }

    #[test]
    fn test_risk_level_default() {
        assert_eq!(EchoTool::new().risk_level(), RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_execute() {
        let tool = EchoTool::new();
        let result = tool
            .execute(serde_json::json!({"a": 1}), ToolContext::new("session-1"))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.structured_output.unwrap()["a"], 1);
    }
}
