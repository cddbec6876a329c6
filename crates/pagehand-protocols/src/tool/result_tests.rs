use super::*;

#[test]
fn test_tool_result_success() {
    let result = ToolResult::success("OK");
    assert!(result.success);
    assert_eq!(result.content, "OK");
    assert!(result.error.is_none());
}

#[test]
fn test_tool_result_error() {
    let result = ToolResult::error("Element 4 not found");
    assert!(!result.success);
    assert!(result.content.is_empty());
    assert_eq!(result.error.as_deref(), Some("Element 4 not found"));
}

#[test]
fn test_from_envelope_success() {
    let result = ToolResult::from_envelope(
        "click",
        serde_json::json!({"success": true, "strategy": "role_name"}),
    );
    assert!(result.success);
    assert!(result.error.is_none());
    assert_eq!(result.structured_output.unwrap()["strategy"], "role_name");
}

#[test]
fn test_from_envelope_failure_keeps_error() {
    let result = ToolResult::from_envelope(
        "click",
        serde_json::json!({"success": false, "error": "No snapshot available"}),
    );
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("No snapshot available"));
}

#[test]
fn test_from_envelope_without_success_flag() {
    let ok = ToolResult::from_envelope("content", serde_json::json!({"content": "hi"}));
    assert!(ok.success);

    let failed = ToolResult::from_envelope("content", serde_json::json!({"error": "detached"}));
    assert!(!failed.success);
    assert_eq!(failed.error.as_deref(), Some("detached"));
}

#[test]
fn test_tool_result_with_metadata() {
    let result = ToolResult::success("OK").with_metadata("duration_ms", serde_json::json!(12));
    assert_eq!(result.metadata["duration_ms"], serde_json::json!(12));
}
