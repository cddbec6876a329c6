//! Tool execution errors.
//!
//! Soft action failures (an element that could not be clicked, a date that
//! did not stick) are not errors here: they travel inside a successful
//! [`ToolResult`](crate::ToolResult) with `success: false`. These variants
//! cover failures of the tool call itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Parameter validation failed: {0}")]
    ValidationFailed(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Browser worker unavailable: {0}")]
    WorkerUnavailable(String),

    /// The engine hit an unrecoverable invariant violation and must not be
    /// used again.
    #[error("Fatal engine error: {0}")]
    Fatal(String),
}

impl ToolError {
    /// Whether the caller may keep issuing tool calls after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ToolError::Fatal(_) | ToolError::WorkerUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_not_found() {
        let err = ToolError::NotFound("click".to_string());
        assert!(err.to_string().contains("Tool not found"));
        assert!(err.to_string().contains("click"));
    }

    #[test]
    fn test_tool_error_invalid_parameters() {
        let err = ToolError::InvalidParameters("missing field `nodeId`".to_string());
        assert!(err.to_string().contains("Invalid parameters"));
        assert!(err.to_string().contains("nodeId"));
    }

    #[test]
    fn test_tool_error_fatal_is_not_recoverable() {
        let err = ToolError::Fatal("thread affinity violated".to_string());
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("Fatal"));
    }

    #[test]
    fn test_worker_unavailable_is_not_recoverable() {
        assert!(!ToolError::WorkerUnavailable("closed".to_string()).is_recoverable());
    }

    #[test]
    fn test_execution_failed_is_recoverable() {
        assert!(ToolError::ExecutionFailed("boom".to_string()).is_recoverable());
        assert!(ToolError::ValidationFailed("bad".to_string()).is_recoverable());
    }
}
