use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 1,
        method: "Page.navigate".to_string(),
        params: Some(serde_json::json!({"url": "https://example.com"})),
        session_id: Some("S1".to_string()),
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("Page.navigate"));
    assert!(json.contains("example.com"));
    assert!(json.contains("\"sessionId\":\"S1\""));
}

#[test]
fn test_cdp_request_omits_empty_fields() {
    let req = CdpRequest {
        id: 7,
        method: "Target.getTargets".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(!json.contains("params"));
    assert!(!json.contains("sessionId"));
}

#[test]
fn test_cdp_response_deserialize() {
    let json = r#"{"id": 1, "result": {"frameId": "abc"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(1));
    assert!(resp.result.is_some());
}

#[test]
fn test_cdp_event_deserialize() {
    let json = r#"{"method": "Page.loadEventFired", "params": {}, "sessionId": "S1"}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert!(resp.id.is_none());
    assert_eq!(resp.method.as_deref(), Some("Page.loadEventFired"));
}

#[test]
fn test_raw_ax_node_deserialize() {
    let json = r#"{
        "nodeId": "12",
        "ignored": false,
        "role": {"type": "role", "value": "button"},
        "name": {"type": "computedString", "value": "Submit"},
        "childIds": ["13"]
    }"#;
    let node: RawAxNode = serde_json::from_str(json).unwrap();
    assert_eq!(node.node_id, "12");
    assert_eq!(node.role.unwrap().text(), "button");
    assert_eq!(node.name.unwrap().text(), "Submit");
}

#[test]
fn test_ax_value_text_stringifies_numbers() {
    let value: AxValue = serde_json::from_str(r#"{"type": "number", "value": 3}"#).unwrap();
    assert_eq!(value.text(), "3");
}

#[test]
fn test_navigation_history_relative() {
    let history: NavigationHistory = serde_json::from_str(
        r#"{"currentIndex": 1, "entries": [
            {"id": 1, "url": "about:blank", "title": ""},
            {"id": 2, "url": "https://a.test/", "title": "A"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(history.relative(-1).unwrap().id, 1);
    assert!(history.relative(1).is_none());
    assert!(history.relative(-2).is_none());
}

#[test]
fn test_mouse_button_serialize() {
    let json = serde_json::to_string(&MouseButton::Left).unwrap();
    assert_eq!(json, "\"left\"");
}

#[test]
fn test_exception_message_prefers_description() {
    let details: ExceptionDetails = serde_json::from_str(
        r#"{"text": "Uncaught", "exception": {"type": "object", "description": "TypeError: x is null"}}"#,
    )
    .unwrap();
    assert_eq!(details.message(), "TypeError: x is null");
}
