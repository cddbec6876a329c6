//! [`PageDriver`] over one flattened CDP target session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::debug;

use super::ax;
use super::keys::KeyChord;
use super::protocol::{
    ExceptionDetails, KeyEventType, MouseButton, MouseEventType, NavigationHistory, RawAxNode,
    ScreenshotClip,
};
use super::transport::Transport;
use crate::driver::{AxNode, DriverError, Locator, PageDriver, Rect, Viewport};
use crate::scripts;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const HISTORY_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// A session attached to a single page target.
pub struct CdpPage {
    target_id: String,
    session_id: String,
    transport: Arc<Transport>,
}

impl CdpPage {
    pub(crate) fn new(target_id: String, session_id: String, transport: Arc<Transport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, DriverError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Enable required CDP domains and apply the viewport size.
    pub(crate) async fn prepare(&self, viewport: Viewport) -> Result<(), DriverError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        self.call("Accessibility.enable", None).await?;
        self.call(
            "Emulation.setDeviceMetricsOverride",
            Some(json!({
                "width": viewport.width,
                "height": viewport.height,
                "deviceScaleFactor": 0,
                "mobile": false,
            })),
        )
        .await?;

        debug!("Prepared CDP session {}", self.session_id);
        Ok(())
    }

    async fn mouse_event(&self, event: MouseEventType, x: f64, y: f64) -> Result<(), DriverError> {
        let button = match event {
            MouseEventType::MouseMoved => MouseButton::None,
            _ => MouseButton::Left,
        };
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": event,
                "x": x,
                "y": y,
                "button": button,
                "clickCount": 1,
            })),
        )
        .await?;
        Ok(())
    }

    async fn navigate_history(&self, offset: i64) -> Result<bool, DriverError> {
        let history: NavigationHistory =
            serde_json::from_value(self.call("Page.getNavigationHistory", None).await?)?;

        let Some(entry) = history.relative(offset) else {
            return Ok(false);
        };

        self.call(
            "Page.navigateToHistoryEntry",
            Some(json!({"entryId": entry.id})),
        )
        .await?;
        self.wait_for_load(HISTORY_LOAD_TIMEOUT).await?;
        Ok(true)
    }

    /// Evaluate `script` repeatedly until `done` accepts the value or
    /// `timeout` elapses. The last value is returned either way.
    async fn poll<F>(&self, script: &str, timeout: Duration, done: F) -> Result<Value, DriverError>
    where
        F: Fn(&Value) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            let value = self.evaluate(script).await?;
            if done(&value) || Instant::now() >= deadline {
                return Ok(value);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageDriver for CdpPage {
    fn page_id(&self) -> &str {
        &self.target_id
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(Value::as_str) {
            return Err(DriverError::NavigationFailed(format!("{}: {}", url, error)));
        }

        self.wait_for_load(timeout).await?;
        debug!("Navigated to {}", url);
        Ok(())
    }

    async fn url(&self) -> Result<String, DriverError> {
        let value = self.evaluate(&scripts::location()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn title(&self) -> Result<String, DriverError> {
        let value = self.evaluate(&scripts::title()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn viewport(&self) -> Result<Viewport, DriverError> {
        let value = self.evaluate(&scripts::viewport()).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn accessibility_tree(&self) -> Result<Option<AxNode>, DriverError> {
        let result = self.call("Accessibility.getFullAXTree", None).await?;
        let nodes: Vec<RawAxNode> = serde_json::from_value(result["nodes"].clone())?;
        debug!("Accessibility tree returned {} raw nodes", nodes.len());
        Ok(ax::build_tree(&nodes))
    }

    async fn evaluate(&self, script: &str) -> Result<Value, DriverError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": script,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let details: ExceptionDetails = serde_json::from_value(exception.clone())?;
            return Err(DriverError::JavaScript(details.message()));
        }

        Ok(result["result"]["value"].clone())
    }

    async fn count(&self, locator: &Locator) -> Result<usize, DriverError> {
        let value = self.evaluate(&scripts::count(locator)).await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn locate(
        &self,
        locator: &Locator,
        timeout: Duration,
        scroll: bool,
    ) -> Result<Option<Rect>, DriverError> {
        let value = self
            .poll(&scripts::locate(locator, scroll), timeout, |v| !v.is_null())
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn fill(&self, locator: &Locator, text: &str, timeout: Duration) -> Result<bool, DriverError> {
        let value = self
            .poll(&scripts::fill(locator, text), timeout, |v| v.as_bool() == Some(true))
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn select_option(
        &self,
        locator: &Locator,
        label: &str,
        timeout: Duration,
    ) -> Result<Option<String>, DriverError> {
        if self.locate(locator, timeout, true).await?.is_none() {
            return Ok(None);
        }
        let value = self.evaluate(&scripts::select_option(locator, label)).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn click_at(&self, x: f64, y: f64) -> Result<(), DriverError> {
        self.mouse_event(MouseEventType::MouseMoved, x, y).await?;
        self.mouse_event(MouseEventType::MousePressed, x, y).await?;
        self.mouse_event(MouseEventType::MouseReleased, x, y).await?;
        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), DriverError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<(), DriverError> {
        let chord = KeyChord::parse(key);
        let down_type = if chord.key.text.is_some() {
            KeyEventType::KeyDown
        } else {
            KeyEventType::RawKeyDown
        };

        let mut down = json!({
            "type": down_type,
            "key": chord.key.key,
            "code": chord.key.code,
            "windowsVirtualKeyCode": chord.key.key_code,
            "modifiers": chord.modifiers,
        });
        if let Some(text) = &chord.key.text {
            down["text"] = json!(text);
        }
        self.call("Input.dispatchKeyEvent", Some(down)).await?;

        self.call(
            "Input.dispatchKeyEvent",
            Some(json!({
                "type": KeyEventType::KeyUp,
                "key": chord.key.key,
                "code": chord.key.code,
                "windowsVirtualKeyCode": chord.key.key_code,
                "modifiers": chord.modifiers,
            })),
        )
        .await?;

        debug!("Pressed {}", key);
        Ok(())
    }

    async fn wait_for_load(&self, timeout: Duration) -> Result<(), DriverError> {
        let state = self
            .poll(&scripts::ready_state(), timeout, |v| {
                matches!(v.as_str(), Some("interactive") | Some("complete"))
            })
            .await?;

        match state.as_str() {
            Some("interactive") | Some("complete") => Ok(()),
            _ => Err(DriverError::Timeout("Page load timeout".to_string())),
        }
    }

    async fn screenshot(&self, full_page: bool) -> Result<String, DriverError> {
        let mut params = json!({
            "format": "png",
            "captureBeyondViewport": full_page,
        });

        if full_page {
            let metrics = self.call("Page.getLayoutMetrics", None).await?;
            let size = &metrics["cssContentSize"];
            let clip = ScreenshotClip {
                x: 0.0,
                y: 0.0,
                width: size["width"].as_f64().unwrap_or(0.0),
                height: size["height"].as_f64().unwrap_or(0.0),
                scale: 1.0,
            };
            if clip.width > 0.0 && clip.height > 0.0 {
                params["clip"] = serde_json::to_value(clip)?;
            }
        }

        let result = self.call("Page.captureScreenshot", Some(params)).await?;
        result["data"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| DriverError::InvalidResponse("Missing screenshot data".to_string()))
    }

    async fn bring_to_front(&self) -> Result<(), DriverError> {
        self.call("Page.bringToFront", None).await?;
        Ok(())
    }

    async fn go_back(&self) -> Result<bool, DriverError> {
        self.navigate_history(-1).await
    }

    async fn go_forward(&self) -> Result<bool, DriverError> {
        self.navigate_history(1).await
    }

    async fn reload(&self) -> Result<(), DriverError> {
        self.call("Page.reload", None).await?;
        self.wait_for_load(HISTORY_LOAD_TIMEOUT).await
    }
}
