//! [`BrowserDriver`] over a CDP browser connection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagehand_config::BrowserConfig;
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, info};

use super::launcher::ChromeLauncher;
use super::page::CdpPage;
use super::protocol::{BrowserVersion, TargetInfo};
use super::transport::Transport;
use crate::driver::{BrowserDriver, DriverError, PageDriver, Viewport};

/// CDP connection to one browser.
///
/// Connects to Chrome via WebSocket and hands out [`CdpPage`] sessions that
/// share the socket.
pub struct CdpBrowser {
    browser_ws_url: String,
    transport: Arc<Transport>,
    viewport: Viewport,
    /// Blank page present at connect time, handed out by the first `new_page`.
    adoptable: Mutex<Option<String>>,
    launcher: Option<tokio::sync::Mutex<ChromeLauncher>>,
}

impl CdpBrowser {
    /// Launch (or reuse) a browser per `config` and connect to it.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, DriverError> {
        let mut launcher = ChromeLauncher::new(config.clone());
        launcher.ensure_running().await?;

        let mut browser = Self::connect(&launcher.endpoint(), config).await?;
        browser.launcher = Some(tokio::sync::Mutex::new(launcher));
        Ok(browser)
    }

    /// Connect to Chrome at the given endpoint.
    ///
    /// ```rust,ignore
    /// let browser = CdpBrowser::connect("http://localhost:9222", &config).await?;
    /// ```
    pub async fn connect(endpoint: &str, config: &BrowserConfig) -> Result<Self, DriverError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| DriverError::BrowserNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| DriverError::BrowserNotAvailable(format!("{}: {}", endpoint, e)))?;

        info!(
            "Connected to browser: {} (protocol {})",
            version.browser, version.protocol_version
        );

        let transport = Transport::connect(
            &version.web_socket_debugger_url,
            Duration::from_secs(config.command_timeout_secs),
        )
        .await?;

        let browser = Self {
            browser_ws_url: version.web_socket_debugger_url,
            transport: Arc::new(transport),
            viewport: Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
            },
            adoptable: Mutex::new(None),
            launcher: None,
        };

        let blank = browser
            .get_targets()
            .await?
            .into_iter()
            .find(|t| t.target_type == "page" && !t.attached.unwrap_or(false) && is_blank(&t.url));
        *browser.adoptable.lock() = blank.map(|t| t.target_id);

        Ok(browser)
    }

    /// Get browser WebSocket URL.
    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// Get all targets.
    pub async fn get_targets(&self) -> Result<Vec<TargetInfo>, DriverError> {
        let result = self.transport.call("Target.getTargets", None, None).await?;
        let targets: Vec<TargetInfo> = serde_json::from_value(result["targetInfos"].clone())?;
        Ok(targets)
    }

    /// Attach to an existing page target.
    pub async fn attach_page(&self, target_id: &str) -> Result<CdpPage, DriverError> {
        let result = self
            .transport
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
                None,
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| DriverError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let page = CdpPage::new(target_id.to_string(), session_id, self.transport.clone());
        page.prepare(self.viewport).await?;
        Ok(page)
    }
}

fn is_blank(url: &str) -> bool {
    url == "about:blank" || url.starts_with("chrome://newtab") || url.starts_with("chrome://new-tab-page")
}

#[async_trait]
impl BrowserDriver for CdpBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageDriver>, DriverError> {
        let adopted = self.adoptable.lock().take();
        let target_id = match adopted {
            Some(id) => id,
            None => {
                let result = self
                    .transport
                    .call(
                        "Target.createTarget",
                        Some(json!({"url": "about:blank"})),
                        None,
                    )
                    .await?;
                result["targetId"]
                    .as_str()
                    .ok_or_else(|| DriverError::InvalidResponse("Missing targetId".to_string()))?
                    .to_string()
            }
        };

        debug!("Attaching to page target {}", target_id);
        let page = self.attach_page(&target_id).await?;
        Ok(Box::new(page))
    }

    async fn close_page(&self, page_id: &str) -> Result<(), DriverError> {
        self.transport
            .call(
                "Target.closeTarget",
                Some(json!({"targetId": page_id})),
                None,
            )
            .await?;
        debug!("Closed page target {}", page_id);
        Ok(())
    }

    /// Kill the browser if this connection launched it.
    async fn shutdown(&self) -> Result<(), DriverError> {
        if let Some(launcher) = &self.launcher {
            launcher.lock().await.shutdown().await;
        }
        Ok(())
    }
}
