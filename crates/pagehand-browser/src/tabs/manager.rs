use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use pagehand_config::TabsConfig;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use super::history::{NavigationEvent, NavigationHistory};
use super::tab::Tab;
use super::TabError;
use crate::driver::{BrowserDriver, PageDriver};

/// Row of `list_tabs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub index: usize,
    pub url: String,
    pub title: String,
    pub purpose: Option<String>,
    pub is_current: bool,
}

/// Domain summary of recent navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationContext {
    pub current_domain: Option<String>,
    /// Distinct domains of the recent window, oldest first.
    pub recent_domains: Vec<String>,
    pub total_tabs: usize,
    pub current_tab: usize,
    pub should_open_new_tab: bool,
    pub recommendation: String,
}

/// Ordered tabs with exactly one current.
pub struct TabManager {
    tabs: Vec<Tab>,
    current: usize,
    history: NavigationHistory,
    config: TabsConfig,
}

impl TabManager {
    pub fn new(first: Box<dyn PageDriver>, config: TabsConfig) -> Self {
        Self {
            tabs: vec![Tab::new(first, Some("main".to_string()))],
            current: 0,
            history: NavigationHistory::new(config.history_limit),
            config,
        }
    }

    pub fn count(&self) -> usize {
        self.tabs.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &dyn PageDriver {
        self.tabs[self.current].page.as_ref()
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    fn check(&self, index: usize) -> Result<(), TabError> {
        if index >= self.tabs.len() {
            return Err(TabError::OutOfRange {
                index,
                count: self.tabs.len(),
            });
        }
        Ok(())
    }

    pub fn page(&self, index: usize) -> Result<&dyn PageDriver, TabError> {
        self.check(index)?;
        Ok(self.tabs[index].page.as_ref())
    }

    /// Open a tab, optionally load `url`, and make it current.
    ///
    /// A page whose first navigation fails is closed again and the tab list
    /// is left untouched.
    pub async fn open(
        &mut self,
        browser: &dyn BrowserDriver,
        url: Option<&str>,
        purpose: Option<String>,
        navigation_timeout: Duration,
    ) -> Result<usize, TabError> {
        let page = browser.new_page().await?;
        if let Some(url) = url {
            if let Err(e) = page.navigate(url, navigation_timeout).await {
                warn!("New tab failed to load {}: {}", url, e);
                if let Err(close) = browser.close_page(page.page_id()).await {
                    debug!("Closing failed tab errored: {}", close);
                }
                return Err(e.into());
            }
        }

        self.tabs.push(Tab::new(page, purpose.clone()));
        let index = self.tabs.len() - 1;
        self.current = index;
        if let Err(e) = self.tabs[index].page.bring_to_front().await {
            debug!("bring_to_front failed: {}", e);
        }
        if let Some(url) = url {
            self.record_navigation(url);
        }
        info!(index, ?purpose, "Opened tab");
        Ok(index)
    }

    /// Make `index` current. Out of range leaves the current tab unchanged.
    pub async fn switch(&mut self, index: usize) -> Result<(), TabError> {
        self.check(index)?;
        self.tabs[index].page.bring_to_front().await?;
        self.current = index;
        debug!(index, "Switched tab");
        Ok(())
    }

    /// Close `index` (default current) and return the closed index.
    ///
    /// The last remaining tab is never closed. Later tabs shift down by one;
    /// the current pointer follows the tab it pointed at.
    pub async fn close(
        &mut self,
        browser: &dyn BrowserDriver,
        index: Option<usize>,
    ) -> Result<usize, TabError> {
        if self.tabs.len() <= 1 {
            return Err(TabError::LastTab);
        }
        let index = index.unwrap_or(self.current);
        self.check(index)?;

        let tab = self.tabs.remove(index);
        if let Err(e) = browser.close_page(tab.page.page_id()).await {
            warn!(index, "Closing page failed: {}", e);
        }

        if self.current >= self.tabs.len() {
            self.current = self.tabs.len() - 1;
        } else if index <= self.current && self.current > 0 {
            self.current -= 1;
        }

        if let Err(e) = self.current_page().bring_to_front().await {
            debug!("bring_to_front failed: {}", e);
        }
        info!(closed = index, current = self.current, "Closed tab");
        Ok(index)
    }

    pub async fn next(&mut self) -> Result<usize, TabError> {
        let index = (self.current + 1) % self.tabs.len();
        self.switch(index).await?;
        Ok(index)
    }

    pub async fn previous(&mut self) -> Result<usize, TabError> {
        let count = self.tabs.len();
        let index = (self.current + count - 1) % count;
        self.switch(index).await?;
        Ok(index)
    }

    /// Close everything but the current tab, which becomes index 0.
    pub async fn close_others(&mut self, browser: &dyn BrowserDriver) -> usize {
        let keep = self.tabs.remove(self.current);
        let closed = self.tabs.len();
        for tab in self.tabs.drain(..) {
            if let Err(e) = browser.close_page(tab.page.page_id()).await {
                warn!("Closing page failed: {}", e);
            }
        }
        self.tabs.push(keep);
        self.current = 0;
        info!(closed, "Closed other tabs");
        closed
    }

    /// Open the URL of `index` (default current) in a new tab.
    pub async fn duplicate(
        &mut self,
        browser: &dyn BrowserDriver,
        index: Option<usize>,
        navigation_timeout: Duration,
    ) -> Result<usize, TabError> {
        let index = index.unwrap_or(self.current);
        self.check(index)?;
        let url = self.tabs[index].page.url().await?;
        let purpose = format!(
            "duplicate_{}",
            self.tabs[index].purpose.as_deref().unwrap_or("tab")
        );
        self.open(browser, Some(&url), Some(purpose), navigation_timeout)
            .await
    }

    pub async fn list(&self) -> Vec<TabInfo> {
        let mut out = Vec::with_capacity(self.tabs.len());
        for (index, tab) in self.tabs.iter().enumerate() {
            out.push(TabInfo {
                index,
                url: tab.page.url().await.unwrap_or_default(),
                title: tab.page.title().await.unwrap_or_default(),
                purpose: tab.purpose.clone(),
                is_current: index == self.current,
            });
        }
        out
    }

    /// Log a navigation of the current tab.
    pub fn record_navigation(&mut self, url: &str) {
        self.history.push(NavigationEvent {
            url: url.to_string(),
            timestamp: Utc::now(),
            tab_index: self.current,
            purpose: self.tabs[self.current].purpose.clone(),
        });
    }

    pub async fn navigation_context(&self) -> NavigationContext {
        let current_domain = self
            .current_page()
            .url()
            .await
            .ok()
            .and_then(|url| domain_of(&url));

        let mut seen = HashSet::new();
        let recent_domains: Vec<String> = self
            .history
            .recent(self.config.recent_window)
            .filter_map(|event| domain_of(&event.url))
            .filter(|domain| seen.insert(domain.clone()))
            .collect();

        let distinct = recent_domains.len();
        let (should_open_new_tab, recommendation) =
            if distinct >= self.config.distinct_domain_threshold {
                (
                    true,
                    format!(
                        "Recent navigation spans {} domains; open a new tab for the next site",
                        distinct
                    ),
                )
            } else if self.tabs.len() == 1 && distinct > 1 {
                (
                    true,
                    "Only one tab is open but navigation moved across domains; consider a new tab"
                        .to_string(),
                )
            } else {
                (false, "Current tab organization is adequate".to_string())
            };

        NavigationContext {
            current_domain,
            recent_domains,
            total_tabs: self.tabs.len(),
            current_tab: self.current,
            should_open_new_tab,
            recommendation,
        }
    }
}

fn domain_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
