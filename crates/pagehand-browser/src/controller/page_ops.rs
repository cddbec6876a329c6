//! Operations on the current page that do not need a snapshot.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::reports::{Ack, LoadStatus, NavigateReport, PageContent, ScreenshotReport, truncate_text};
use super::BrowserController;
use crate::error::FatalError;
use crate::readiness::wait_for_body;
use crate::scripts;

/// How long a freshly navigated page gets to show its body.
const NAVIGATION_BODY_TIMEOUT: Duration = Duration::from_secs(10);

/// Fraction of the viewport height moved per scroll.
const SCROLL_FRACTION: f64 = 0.8;

#[derive(Debug, Default, Deserialize)]
struct RawPageText {
    #[serde(default)]
    text: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLoadStatus {
    #[serde(default)]
    ready_state: String,
    #[serde(default, rename = "isDOMContentLoaded")]
    is_dom_content_loaded: bool,
    #[serde(default)]
    is_page_complete: bool,
}

impl BrowserController {
    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// Load `url` in the current tab.
    pub async fn navigate(&mut self, url: &str) -> Result<NavigateReport, FatalError> {
        self.guard.check("navigate")?;
        self.invalidate();
        let page = self.tabs.current_page();
        let timeout = Self::ms(self.config.actions.navigation_timeout_ms);

        if let Err(e) = page.navigate(url, timeout).await {
            warn!("Navigation to {} failed: {}", url, e);
            return Ok(NavigateReport {
                success: false,
                url: url.to_string(),
                error: Some(e.to_string()),
                ..Default::default()
            });
        }

        match wait_for_body(page, NAVIGATION_BODY_TIMEOUT).await {
            Ok(true) => {}
            Ok(false) => debug!("Body not visible after navigation, continuing"),
            Err(e) => debug!("Body wait failed after navigation: {}", e),
        }
        tokio::time::sleep(Self::ms(self.config.actions.settle_delay_ms)).await;

        let final_url = page.url().await.unwrap_or_else(|_| url.to_string());
        let title = page.title().await.unwrap_or_default();
        self.tabs.record_navigation(&final_url);
        info!("Navigated to {}", final_url);

        Ok(NavigateReport {
            success: true,
            url: final_url,
            title,
            error: None,
        })
    }

    pub async fn scroll_down(&self) -> Result<Ack, FatalError> {
        self.guard.check("scroll_down")?;
        Ok(self.scroll(SCROLL_FRACTION).await)
    }

    pub async fn scroll_up(&self) -> Result<Ack, FatalError> {
        self.guard.check("scroll_up")?;
        Ok(self.scroll(-SCROLL_FRACTION).await)
    }

    async fn scroll(&self, fraction: f64) -> Ack {
        let page = self.tabs.current_page();
        if let Err(e) = page.evaluate(&scripts::scroll_by(fraction)).await {
            return Ack::failed(e);
        }
        tokio::time::sleep(Self::ms(self.config.actions.scroll_settle_ms)).await;
        Ack::ok()
    }

    /// Visible text of the page, cut at the configured length.
    pub async fn get_page_content(&self) -> Result<PageContent, FatalError> {
        self.guard.check("get_page_content")?;
        let raw = match self
            .tabs
            .current_page()
            .evaluate(&scripts::page_text())
            .await
        {
            Ok(value) => serde_json::from_value::<RawPageText>(value).unwrap_or_default(),
            Err(e) => {
                return Ok(PageContent {
                    success: false,
                    error: Some(e.to_string()),
                    ..Default::default()
                });
            }
        };

        let (text, truncated) = truncate_text(raw.text, self.config.actions.page_text_limit);
        Ok(PageContent {
            success: true,
            text,
            title: raw.title,
            url: raw.url,
            truncated,
            error: None,
        })
    }

    pub async fn capture_screenshot(&self, full_page: bool) -> Result<ScreenshotReport, FatalError> {
        self.guard.check("capture_screenshot")?;
        Ok(match self.tabs.current_page().screenshot(full_page).await {
            Ok(png) => ScreenshotReport {
                success: true,
                data_url: Some(format!("data:image/png;base64,{}", png)),
                error: None,
            },
            Err(e) => ScreenshotReport {
                success: false,
                data_url: None,
                error: Some(e.to_string()),
            },
        })
    }

    /// Press a key or a `Modifier+Key` combination.
    pub async fn send_keys(&self, key: &str) -> Result<Ack, FatalError> {
        self.guard.check("send_keys")?;
        if let Err(e) = self.tabs.current_page().press_key(key).await {
            return Ok(Ack::failed(e));
        }
        tokio::time::sleep(Self::ms(self.config.actions.key_settle_ms)).await;
        Ok(Ack::ok())
    }

    pub async fn get_page_load_status(&self) -> Result<LoadStatus, FatalError> {
        self.guard.check("get_page_load_status")?;
        let raw = match self
            .tabs
            .current_page()
            .evaluate(&scripts::load_status())
            .await
        {
            Ok(value) => serde_json::from_value::<RawLoadStatus>(value).unwrap_or_default(),
            Err(e) => {
                return Ok(LoadStatus {
                    success: false,
                    error: Some(e.to_string()),
                    ..Default::default()
                });
            }
        };
        Ok(LoadStatus {
            success: true,
            is_resources_loading: !raw.is_page_complete,
            ready_state: raw.ready_state,
            is_dom_content_loaded: raw.is_dom_content_loaded,
            is_page_complete: raw.is_page_complete,
            error: None,
        })
    }

    pub async fn go_back(&mut self) -> Result<Ack, FatalError> {
        self.guard.check("go_back")?;
        let moved = self.tabs.current_page().go_back().await;
        Ok(self.after_history_move(moved, "No previous page in history").await)
    }

    pub async fn go_forward(&mut self) -> Result<Ack, FatalError> {
        self.guard.check("go_forward")?;
        let moved = self.tabs.current_page().go_forward().await;
        Ok(self.after_history_move(moved, "No next page in history").await)
    }

    async fn after_history_move(
        &mut self,
        moved: Result<bool, crate::driver::DriverError>,
        none_message: &str,
    ) -> Ack {
        match moved {
            Ok(true) => {}
            Ok(false) => return Ack::failed(none_message),
            Err(e) => return Ack::failed(e),
        }
        self.invalidate();

        let page = self.tabs.current_page();
        if let Err(e) = page
            .wait_for_load(Self::ms(self.config.actions.navigation_timeout_ms))
            .await
        {
            debug!("Load wait after history move failed: {}", e);
        }
        match page.url().await {
            Ok(url) => {
                self.tabs.record_navigation(&url);
                Ack::message(format!("Now at {}", url))
            }
            Err(_) => Ack::ok(),
        }
    }

    /// Reload tab `index`, or the current tab.
    pub async fn reload_tab(&mut self, index: Option<usize>) -> Result<Ack, FatalError> {
        self.guard.check("reload_tab")?;
        let index = index.unwrap_or(self.tabs.current_index());
        let page = match self.tabs.page(index) {
            Ok(page) => page,
            Err(e) => return Ok(Ack::failed(e)),
        };
        if let Err(e) = page.reload().await {
            return Ok(Ack::failed(e));
        }
        if let Err(e) = page
            .wait_for_load(Self::ms(self.config.actions.navigation_timeout_ms))
            .await
        {
            debug!("Load wait after reload failed: {}", e);
        }
        if index == self.tabs.current_index() {
            self.invalidate();
        }
        Ok(Ack::message(format!("Reloaded tab {}", index)))
    }
}
