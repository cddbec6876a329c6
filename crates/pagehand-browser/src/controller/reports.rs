//! Envelopes returned by page and tab operations.

use std::fmt::Display;

use serde::Serialize;

use crate::tabs::{NavigationContext, TabInfo};

/// Bare success/failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Display) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigateReport {
    pub success: bool,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageContent {
    pub success: bool,
    pub text: String,
    pub title: String,
    pub url: String,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStatus {
    pub success: bool,
    pub ready_state: String,
    pub is_resources_loading: bool,
    #[serde(rename = "isDOMContentLoaded")]
    pub is_dom_content_loaded: bool,
    pub is_page_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a tab operation, with the tab layout after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_index: Option<usize>,
    pub current_tab: usize,
    pub total_tabs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabList {
    pub success: bool,
    pub tabs: Vec<TabInfo>,
    pub current_tab: usize,
    pub total_tabs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextReport {
    pub success: bool,
    #[serde(flatten)]
    pub context: NavigationContext,
}

/// Cut `text` after `limit` characters, marking the cut.
pub(crate) fn truncate_text(text: String, limit: usize) -> (String, bool) {
    match text.char_indices().nth(limit) {
        Some((end, _)) => (format!("{}... [truncated]", &text[..end]), true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short".to_string(), 10), ("short".to_string(), false));
        assert_eq!(
            truncate_text("héllo wörld".to_string(), 5),
            ("héllo... [truncated]".to_string(), true)
        );
        assert_eq!(truncate_text("exact".to_string(), 5), ("exact".to_string(), false));
    }

    #[test]
    fn test_load_status_field_names() {
        let status = LoadStatus {
            success: true,
            ready_state: "interactive".to_string(),
            is_resources_loading: true,
            is_dom_content_loaded: true,
            is_page_complete: false,
            error: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["readyState"], "interactive");
        assert_eq!(json["isDOMContentLoaded"], true);
        assert_eq!(json["isResourcesLoading"], true);
        assert_eq!(json["isPageComplete"], false);
    }

    #[test]
    fn test_ack_shapes() {
        let json = serde_json::to_value(Ack::failed("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
        let json = serde_json::to_value(Ack::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));
    }
}
