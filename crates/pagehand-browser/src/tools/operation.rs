//! Catalogue of the operations exposed as tools.

use pagehand_protocols::{Parameters, RiskLevel, ToolDefinition};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetSnapshot,
    Click,
    ClickByText,
    InputText,
    SelectDate,
    SelectDropdownOption,
    GetElementState,
    CheckForFormErrors,
    Navigate,
    ScrollDown,
    ScrollUp,
    GetPageContent,
    CaptureScreenshot,
    SendKeys,
    GetPageLoadStatus,
    OpenNewTab,
    SwitchToTab,
    CloseTab,
    ListTabs,
    NextTab,
    PreviousTab,
    GoBack,
    GoForward,
    ReloadTab,
    CloseOtherTabs,
    DuplicateTab,
    GetNavigationContext,
}

impl Operation {
    pub const ALL: [Operation; 27] = [
        Operation::GetSnapshot,
        Operation::Click,
        Operation::ClickByText,
        Operation::InputText,
        Operation::SelectDate,
        Operation::SelectDropdownOption,
        Operation::GetElementState,
        Operation::CheckForFormErrors,
        Operation::Navigate,
        Operation::ScrollDown,
        Operation::ScrollUp,
        Operation::GetPageContent,
        Operation::CaptureScreenshot,
        Operation::SendKeys,
        Operation::GetPageLoadStatus,
        Operation::OpenNewTab,
        Operation::SwitchToTab,
        Operation::CloseTab,
        Operation::ListTabs,
        Operation::NextTab,
        Operation::PreviousTab,
        Operation::GoBack,
        Operation::GoForward,
        Operation::ReloadTab,
        Operation::CloseOtherTabs,
        Operation::DuplicateTab,
        Operation::GetNavigationContext,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Operation::GetSnapshot => "get_snapshot",
            Operation::Click => "click",
            Operation::ClickByText => "click_by_text",
            Operation::InputText => "input_text",
            Operation::SelectDate => "select_date",
            Operation::SelectDropdownOption => "select_dropdown_option",
            Operation::GetElementState => "get_element_state",
            Operation::CheckForFormErrors => "check_for_form_errors",
            Operation::Navigate => "navigate",
            Operation::ScrollDown => "scroll_down",
            Operation::ScrollUp => "scroll_up",
            Operation::GetPageContent => "get_page_content",
            Operation::CaptureScreenshot => "capture_screenshot",
            Operation::SendKeys => "send_keys",
            Operation::GetPageLoadStatus => "get_page_load_status",
            Operation::OpenNewTab => "open_new_tab",
            Operation::SwitchToTab => "switch_to_tab",
            Operation::CloseTab => "close_tab",
            Operation::ListTabs => "list_tabs",
            Operation::NextTab => "next_tab",
            Operation::PreviousTab => "previous_tab",
            Operation::GoBack => "go_back",
            Operation::GoForward => "go_forward",
            Operation::ReloadTab => "reload_tab",
            Operation::CloseOtherTabs => "close_other_tabs",
            Operation::DuplicateTab => "duplicate_tab",
            Operation::GetNavigationContext => "get_navigation_context",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.id() == id)
    }

    fn title(self) -> String {
        let mut title = String::new();
        for word in self.id().split('_') {
            if !title.is_empty() {
                title.push(' ');
            }
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                title.extend(first.to_uppercase());
                title.push_str(chars.as_str());
            }
        }
        title
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::GetSnapshot => {
                "List the interactable elements of the current page. Each element has a nodeId \
                 valid until the next snapshot, navigation or tab change. Call this before any \
                 nodeId-based action."
            }
            Operation::Click => {
                "Click the element with the given nodeId. Checkboxes, radios and switches that \
                 are already checked are left alone unless verifyToggle is false."
            }
            Operation::ClickByText => {
                "Click a button or link by its visible text. Use for controls like Next or \
                 Submit when a nodeId may be stale."
            }
            Operation::InputText => "Replace the value of a text field with the given text.",
            Operation::SelectDate => {
                "Set a date field. Accepts YYYY-MM-DD, YYYY/MM/DD, MM/DD/YYYY or DD/MM/YYYY."
            }
            Operation::SelectDropdownOption => {
                "Choose an option of a native select or a custom dropdown by its visible text."
            }
            Operation::GetElementState => {
                "Read checked, aria-checked, value and disabled of an element."
            }
            Operation::CheckForFormErrors => "Collect visible form validation messages.",
            Operation::Navigate => "Load a URL in the current tab.",
            Operation::ScrollDown => "Scroll down by most of a screen.",
            Operation::ScrollUp => "Scroll up by most of a screen.",
            Operation::GetPageContent => "Visible text of the page, with its title and URL.",
            Operation::CaptureScreenshot => "PNG screenshot of the page as a data URL.",
            Operation::SendKeys => {
                "Press a key such as Enter, Tab or Escape, or a combination such as Control+a."
            }
            Operation::GetPageLoadStatus => "Report whether the page has finished loading.",
            Operation::OpenNewTab => "Open a new tab, optionally at a URL, and make it current.",
            Operation::SwitchToTab => "Make the tab at tabIndex current.",
            Operation::CloseTab => "Close the tab at tabIndex, or the current tab. The last tab stays open.",
            Operation::ListTabs => "List open tabs with their URL, title and purpose.",
            Operation::NextTab => "Switch to the next tab, wrapping around.",
            Operation::PreviousTab => "Switch to the previous tab, wrapping around.",
            Operation::GoBack => "Go back in the current tab's history.",
            Operation::GoForward => "Go forward in the current tab's history.",
            Operation::ReloadTab => "Reload the tab at tabIndex, or the current tab.",
            Operation::CloseOtherTabs => "Close every tab except the current one.",
            Operation::DuplicateTab => "Open the URL of the tab at tabIndex, or the current tab, in a new tab.",
            Operation::GetNavigationContext => {
                "Summarize recently visited domains and recommend whether to open a new tab."
            }
        }
    }

    pub fn risk_level(self) -> RiskLevel {
        match self {
            Operation::GetSnapshot
            | Operation::GetElementState
            | Operation::CheckForFormErrors
            | Operation::ScrollDown
            | Operation::ScrollUp
            | Operation::GetPageContent
            | Operation::CaptureScreenshot
            | Operation::GetPageLoadStatus
            | Operation::ListTabs
            | Operation::NextTab
            | Operation::PreviousTab
            | Operation::SwitchToTab
            | Operation::GetNavigationContext => RiskLevel::Low,
            Operation::CloseTab | Operation::CloseOtherTabs => RiskLevel::High,
            _ => RiskLevel::Medium,
        }
    }

    pub fn parameters(self) -> Parameters {
        let node_id = json!({"type": "integer", "minimum": 0, "description": "nodeId from the latest snapshot"});
        let tab_index = json!({"type": "integer", "minimum": 0, "description": "Zero-based tab index"});
        let text = json!({"type": "string"});
        let params = Parameters::new();
        match self {
            Operation::GetSnapshot => params.optional(
                "viewportOnly",
                json!({"type": "boolean", "description": "Only elements inside the viewport"}),
            ),
            Operation::Click => params
                .required("nodeId", node_id)
                .optional("verifyToggle", json!({"type": "boolean", "default": true})),
            Operation::ClickByText => params
                .required("text", text)
                .optional("elementType", json!({"type": "string", "enum": ["button", "link"]})),
            Operation::InputText => params.required("nodeId", node_id).required("text", text),
            Operation::SelectDate => params.required("nodeId", node_id).required("date", text),
            Operation::SelectDropdownOption => {
                params.required("nodeId", node_id).required("optionText", text)
            }
            Operation::GetElementState => params.required("nodeId", node_id),
            Operation::Navigate => params.required("url", text),
            Operation::CaptureScreenshot => {
                params.optional("fullPage", json!({"type": "boolean", "default": false}))
            }
            Operation::SendKeys => params.required("key", text),
            Operation::OpenNewTab => params.optional("url", text).optional(
                "purpose",
                json!({"type": "string", "description": "Why the tab is opened"}),
            ),
            Operation::SwitchToTab => params.required("tabIndex", tab_index),
            Operation::CloseTab | Operation::ReloadTab | Operation::DuplicateTab => {
                params.optional("tabIndex", tab_index)
            }
            Operation::CheckForFormErrors
            | Operation::ScrollDown
            | Operation::ScrollUp
            | Operation::GetPageContent
            | Operation::GetPageLoadStatus
            | Operation::ListTabs
            | Operation::NextTab
            | Operation::PreviousTab
            | Operation::GoBack
            | Operation::GoForward
            | Operation::CloseOtherTabs
            | Operation::GetNavigationContext => params,
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition::new(self.id(), self.title(), self.description())
            .with_parameters(self.parameters())
            .with_risk_level(self.risk_level())
    }
}
