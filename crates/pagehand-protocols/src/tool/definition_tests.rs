use super::*;

fn node_id() -> Value {
    json!({"type": "integer", "minimum": 0})
}

#[test]
fn test_new_defaults() {
    let def = ToolDefinition::new("click", "Click", "Click an element by nodeId");
    assert_eq!(def.id, "click");
    assert_eq!(def.title, "Click");
    assert_eq!(def.risk_level, RiskLevel::Low);
    assert!(def.parameters.is_empty());
}

#[test]
fn test_parameters_track_required_names() {
    let params = Parameters::new()
        .required("nodeId", node_id())
        .optional("verifyToggle", json!({"type": "boolean", "default": true}));
    assert!(params.has_required());
    assert_eq!(params.required, vec!["nodeId".to_string()]);

    let schema = params.to_schema();
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["required"], json!(["nodeId"]));
    assert_eq!(schema["properties"]["verifyToggle"]["default"], true);
}

#[test]
fn test_export_without_parameters_is_empty_object() {
    let def = ToolDefinition::new("scroll_down", "Scroll Down", "Scroll the page down.");
    let func = def.export(ExportFormat::OpenAi);
    assert_eq!(func["type"], "function");
    assert_eq!(func["function"]["name"], "scroll_down");
    assert_eq!(
        func["function"]["parameters"],
        json!({"type": "object", "properties": {}, "required": []})
    );
}

#[test]
fn test_formats_share_name_and_schema() {
    let def = ToolDefinition::new("input_text", "Input Text", "Type into a field.")
        .with_parameters(Parameters::new().required("nodeId", node_id()))
        .with_risk_level(RiskLevel::Medium);
    let openai = def.export(ExportFormat::OpenAi);
    let anthropic = def.export(ExportFormat::Anthropic);
    assert_eq!(anthropic["name"], "input_text");
    assert_eq!(anthropic["input_schema"], openai["function"]["parameters"]);
    assert_eq!(anthropic["description"], "Type into a field.");
}

#[test]
fn test_high_risk_export_warns_in_description() {
    let def = ToolDefinition::new("close_tab", "Close Tab", "Close the tab.")
        .with_risk_level(RiskLevel::High);
    let tool = def.export(ExportFormat::Anthropic);
    assert_eq!(tool["description"], "Close the tab. This cannot be undone.");
    assert_eq!(def.description, "Close the tab.");
}
