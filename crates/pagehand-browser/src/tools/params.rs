//! Tool parameters and their mapping onto controller calls.

use pagehand_protocols::ToolError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::operation::Operation;
use crate::controller::BrowserController;
use crate::error::FatalError;

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotParams {
    pub viewport_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickParams {
    pub node_id: usize,
    #[serde(default = "default_true")]
    pub verify_toggle: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickByTextParams {
    pub text: String,
    pub element_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTextParams {
    pub node_id: usize,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectDateParams {
    pub node_id: usize,
    pub date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownParams {
    pub node_id: usize,
    pub option_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeParams {
    pub node_id: usize,
}

#[derive(Debug, Deserialize)]
pub struct NavigateParams {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotParams {
    #[serde(default)]
    pub full_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct SendKeysParams {
    pub key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenTabParams {
    pub url: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabIndexParams {
    pub tab_index: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalTabParams {
    pub tab_index: Option<usize>,
}

/// One fully parsed tool call.
#[derive(Debug)]
pub enum Request {
    GetSnapshot(SnapshotParams),
    Click(ClickParams),
    ClickByText(ClickByTextParams),
    InputText(InputTextParams),
    SelectDate(SelectDateParams),
    SelectDropdownOption(DropdownParams),
    GetElementState(NodeParams),
    CheckForFormErrors,
    Navigate(NavigateParams),
    ScrollDown,
    ScrollUp,
    GetPageContent,
    CaptureScreenshot(ScreenshotParams),
    SendKeys(SendKeysParams),
    GetPageLoadStatus,
    OpenNewTab(OpenTabParams),
    SwitchToTab(TabIndexParams),
    CloseTab(OptionalTabParams),
    ListTabs,
    NextTab,
    PreviousTab,
    GoBack,
    GoForward,
    ReloadTab(OptionalTabParams),
    CloseOtherTabs,
    DuplicateTab(OptionalTabParams),
    GetNavigationContext,
}

/// Deserialize `params`, treating `null` as an empty object.
fn parse<T: DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

impl Request {
    pub fn parse(operation: Operation, params: Value) -> Result<Self, ToolError> {
        Ok(match operation {
            Operation::GetSnapshot => Request::GetSnapshot(parse(params)?),
            Operation::Click => Request::Click(parse(params)?),
            Operation::ClickByText => Request::ClickByText(parse(params)?),
            Operation::InputText => Request::InputText(parse(params)?),
            Operation::SelectDate => Request::SelectDate(parse(params)?),
            Operation::SelectDropdownOption => Request::SelectDropdownOption(parse(params)?),
            Operation::GetElementState => Request::GetElementState(parse(params)?),
            Operation::CheckForFormErrors => Request::CheckForFormErrors,
            Operation::Navigate => Request::Navigate(parse(params)?),
            Operation::ScrollDown => Request::ScrollDown,
            Operation::ScrollUp => Request::ScrollUp,
            Operation::GetPageContent => Request::GetPageContent,
            Operation::CaptureScreenshot => Request::CaptureScreenshot(parse(params)?),
            Operation::SendKeys => Request::SendKeys(parse(params)?),
            Operation::GetPageLoadStatus => Request::GetPageLoadStatus,
            Operation::OpenNewTab => Request::OpenNewTab(parse(params)?),
            Operation::SwitchToTab => Request::SwitchToTab(parse(params)?),
            Operation::CloseTab => Request::CloseTab(parse(params)?),
            Operation::ListTabs => Request::ListTabs,
            Operation::NextTab => Request::NextTab,
            Operation::PreviousTab => Request::PreviousTab,
            Operation::GoBack => Request::GoBack,
            Operation::GoForward => Request::GoForward,
            Operation::ReloadTab => Request::ReloadTab(parse(params)?),
            Operation::CloseOtherTabs => Request::CloseOtherTabs,
            Operation::DuplicateTab => Request::DuplicateTab(parse(params)?),
            Operation::GetNavigationContext => Request::GetNavigationContext,
        })
    }

    /// Run against the controller and return the serialized envelope.
    pub async fn run(self, c: &mut BrowserController) -> Result<Value, FatalError> {
        Ok(match self {
            Request::GetSnapshot(p) => envelope(&c.get_snapshot(p.viewport_only).await?),
            Request::Click(p) => envelope(&c.click(p.node_id, p.verify_toggle).await?),
            Request::ClickByText(p) => {
                envelope(&c.click_by_text(&p.text, p.element_type.as_deref()).await?)
            }
            Request::InputText(p) => envelope(&c.input_text(p.node_id, &p.text).await?),
            Request::SelectDate(p) => envelope(&c.select_date(p.node_id, &p.date).await?),
            Request::SelectDropdownOption(p) => {
                envelope(&c.select_dropdown_option(p.node_id, &p.option_text).await?)
            }
            Request::GetElementState(p) => envelope(&c.get_element_state(p.node_id).await?),
            Request::CheckForFormErrors => envelope(&c.check_for_form_errors().await?),
            Request::Navigate(p) => envelope(&c.navigate(&p.url).await?),
            Request::ScrollDown => envelope(&c.scroll_down().await?),
            Request::ScrollUp => envelope(&c.scroll_up().await?),
            Request::GetPageContent => envelope(&c.get_page_content().await?),
            Request::CaptureScreenshot(p) => envelope(&c.capture_screenshot(p.full_page).await?),
            Request::SendKeys(p) => envelope(&c.send_keys(&p.key).await?),
            Request::GetPageLoadStatus => envelope(&c.get_page_load_status().await?),
            Request::OpenNewTab(p) => envelope(&c.open_new_tab(p.url.as_deref(), p.purpose).await?),
            Request::SwitchToTab(p) => envelope(&c.switch_to_tab(p.tab_index).await?),
            Request::CloseTab(p) => envelope(&c.close_tab(p.tab_index).await?),
            Request::ListTabs => envelope(&c.list_tabs().await?),
            Request::NextTab => envelope(&c.next_tab().await?),
            Request::PreviousTab => envelope(&c.previous_tab().await?),
            Request::GoBack => envelope(&c.go_back().await?),
            Request::GoForward => envelope(&c.go_forward().await?),
            Request::ReloadTab(p) => envelope(&c.reload_tab(p.tab_index).await?),
            Request::CloseOtherTabs => envelope(&c.close_other_tabs().await?),
            Request::DuplicateTab(p) => envelope(&c.duplicate_tab(p.tab_index).await?),
            Request::GetNavigationContext => envelope(&c.get_navigation_context().await?),
        })
    }
}

fn envelope<T: serde::Serialize>(report: &T) -> Value {
    serde_json::to_value(report)
        .unwrap_or_else(|e| json!({"success": false, "error": format!("Unserializable result: {}", e)}))
}
