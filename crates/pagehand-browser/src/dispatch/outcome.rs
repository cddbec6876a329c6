//! Result envelopes of dispatcher actions.

use serde::Serialize;

use crate::error::ActionError;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Element state as read by isolated probes. A probe that failed leaves its
/// field `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementState {
    pub checked: Option<bool>,
    pub aria_checked: Option<String>,
    pub value: Option<String>,
    pub disabled: Option<bool>,
}

/// Outcome of one dispatcher action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "is_false")]
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Strategy that succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ElementState>,
    #[serde(rename = "pre_state", skip_serializing_if = "Option::is_none")]
    pub pre_state: Option<ElementState>,
    #[serde(rename = "post_state", skip_serializing_if = "Option::is_none")]
    pub post_state: Option<ElementState>,
    /// Post-input DOM check. `false` is advisory for text input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ActionOutcome {
    pub fn succeeded(strategy: &'static str) -> Self {
        Self {
            success: true,
            strategy: Some(strategy),
            ..Default::default()
        }
    }

    pub fn failed(error: &ActionError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            ..Default::default()
        }
    }

    pub fn skipped(state: ElementState, reason: impl Into<String>) -> Self {
        Self {
            success: true,
            skipped: true,
            message: Some(reason.into()),
            state: Some(state),
            ..Default::default()
        }
    }

    pub fn with_state(state: ElementState) -> Self {
        Self {
            success: true,
            state: Some(state),
            ..Default::default()
        }
    }

    /// Turn a reported success into a failure after a failed post-check.
    pub fn overridden(mut self, message: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(message.into());
        self.error_kind = Some("verification");
        self.verified = Some(false);
        self
    }
}

/// Result of scanning the page for validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrorReport {
    pub success: bool,
    pub has_errors: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_carries_kind() {
        let outcome = ActionOutcome::failed(&ActionError::NotFound(9));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errorKind"], "not_found");
        assert!(json["error"].as_str().unwrap().contains('9'));
        assert!(json.get("skipped").is_none());
    }

    #[test]
    fn test_toggle_states_keep_snake_case_keys() {
        let mut outcome = ActionOutcome::succeeded("role_name");
        outcome.pre_state = Some(ElementState {
            checked: Some(false),
            ..Default::default()
        });
        outcome.post_state = Some(ElementState {
            checked: Some(true),
            aria_checked: Some("true".to_string()),
            ..Default::default()
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["pre_state"]["checked"], false);
        assert_eq!(json["post_state"]["ariaChecked"], "true");
        assert_eq!(json["strategy"], "role_name");
    }

    #[test]
    fn test_overridden_outcome() {
        let outcome = ActionOutcome::succeeded("keyboard").overridden("empty value");
        assert!(!outcome.success);
        assert_eq!(outcome.verified, Some(false));
        assert_eq!(outcome.strategy, Some("keyboard"));
    }
}
