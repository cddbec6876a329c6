//! The engine facade.
//!
//! [`BrowserController`] owns the driver session, the tabs and the latest
//! snapshot. Every public operation checks thread affinity first; that check
//! is the only thing that can make an operation return `Err`. Everything
//! else, including driver failures, comes back as a `{success: false}`
//! envelope.

mod page_ops;
mod reports;
mod tab_ops;

use pagehand_config::Config;
use tracing::{info, warn};

pub use reports::{
    Ack, ContextReport, LoadStatus, NavigateReport, PageContent, ScreenshotReport, TabList,
    TabReport,
};

use crate::affinity::ThreadAffinityGuard;
use crate::cache::ElementCache;
use crate::dispatch::{ActionDispatcher, ActionOutcome, FormErrorReport};
use crate::driver::{BrowserDriver, DriverError};
use crate::error::FatalError;
use crate::snapshot::{Snapshot, SnapshotBuilder};
use crate::tabs::TabManager;

pub struct BrowserController {
    guard: ThreadAffinityGuard,
    browser: Box<dyn BrowserDriver>,
    tabs: TabManager,
    cache: ElementCache,
    config: Config,
}

impl BrowserController {
    /// Open the first tab and bind the session to the calling thread.
    pub async fn new(browser: Box<dyn BrowserDriver>, config: Config) -> Result<Self, DriverError> {
        let guard = ThreadAffinityGuard::bind();
        let first = browser.new_page().await?;
        let tabs = TabManager::new(first, config.tabs.clone());
        info!(page = tabs.current_page().page_id(), "Browser controller ready");
        Ok(Self {
            guard,
            browser,
            tabs,
            cache: ElementCache::new(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn latest_snapshot(&self) -> Option<&Snapshot> {
        self.cache.latest()
    }

    pub fn current_tab(&self) -> usize {
        self.tabs.current_index()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.count()
    }

    fn dispatcher(&self) -> ActionDispatcher<'_> {
        ActionDispatcher::new(self.tabs.current_page(), &self.cache, &self.config.actions)
    }

    /// Forget the cached snapshot once the page it described is gone.
    fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Capture the interactable elements of the current tab.
    ///
    /// `viewport_only` defaults to the configured value. A failed capture
    /// is returned with `error` set and leaves the previous snapshot cached.
    pub async fn get_snapshot(&mut self, viewport_only: Option<bool>) -> Result<Snapshot, FatalError> {
        self.guard.check("get_snapshot")?;
        let viewport_only = viewport_only.unwrap_or(self.config.snapshot.default_viewport_only);
        let snapshot_id = self.cache.next_id();
        let snapshot = SnapshotBuilder::new(self.tabs.current_page(), &self.config)
            .build(snapshot_id, viewport_only)
            .await;
        self.cache.store(&snapshot);
        Ok(snapshot)
    }

    pub async fn click(&self, node_id: usize, verify_toggle: bool) -> Result<ActionOutcome, FatalError> {
        self.guard.check("click")?;
        Ok(self.dispatcher().click(node_id, verify_toggle).await)
    }

    pub async fn click_by_text(
        &self,
        text: &str,
        element_type: Option<&str>,
    ) -> Result<ActionOutcome, FatalError> {
        self.guard.check("click_by_text")?;
        Ok(self.dispatcher().click_by_text(text, element_type).await)
    }

    pub async fn input_text(&self, node_id: usize, text: &str) -> Result<ActionOutcome, FatalError> {
        self.guard.check("input_text")?;
        Ok(self.dispatcher().input_text(node_id, text).await)
    }

    pub async fn select_date(&self, node_id: usize, date: &str) -> Result<ActionOutcome, FatalError> {
        self.guard.check("select_date")?;
        Ok(self.dispatcher().select_date(node_id, date).await)
    }

    pub async fn select_dropdown_option(
        &self,
        node_id: usize,
        option_text: &str,
    ) -> Result<ActionOutcome, FatalError> {
        self.guard.check("select_dropdown_option")?;
        Ok(self
            .dispatcher()
            .select_dropdown_option(node_id, option_text)
            .await)
    }

    pub async fn get_element_state(&self, node_id: usize) -> Result<ActionOutcome, FatalError> {
        self.guard.check("get_element_state")?;
        Ok(self.dispatcher().get_element_state(node_id).await)
    }

    pub async fn check_for_form_errors(&self) -> Result<FormErrorReport, FatalError> {
        self.guard.check("check_for_form_errors")?;
        Ok(self.dispatcher().check_for_form_errors().await)
    }

    /// Release the browser. The controller must not be used afterwards.
    pub async fn shutdown(&mut self) -> Result<(), FatalError> {
        self.guard.check("shutdown")?;
        self.invalidate();
        if let Err(e) = self.browser.shutdown().await {
            warn!("Browser shutdown failed: {}", e);
        }
        info!("Browser controller shut down");
        Ok(())
    }
}
