//! Tab operations.
//!
//! Any operation that changes which page is current drops the cached
//! snapshot, since its nodeIds described the previous page.

use std::time::Duration;

use super::reports::{ContextReport, TabList, TabReport};
use super::BrowserController;
use crate::error::FatalError;
use crate::tabs::TabError;

impl BrowserController {
    fn tab_report(&self, tab_index: Option<usize>, message: String) -> TabReport {
        TabReport {
            success: true,
            tab_index,
            current_tab: self.tabs.current_index(),
            total_tabs: self.tabs.count(),
            url: None,
            message: Some(message),
            error: None,
        }
    }

    fn tab_failure(&self, error: TabError) -> TabReport {
        TabReport {
            success: false,
            current_tab: self.tabs.current_index(),
            total_tabs: self.tabs.count(),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    /// Drop the snapshot if the current page changed, then fold the result.
    fn settle_tab_change(&mut self, before: String, result: Result<TabReport, TabError>) -> TabReport {
        if self.tabs.current_page().page_id() != before {
            self.invalidate();
        }
        result.unwrap_or_else(|e| self.tab_failure(e))
    }

    fn current_page_id(&self) -> String {
        self.tabs.current_page().page_id().to_string()
    }

    fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.config.actions.navigation_timeout_ms)
    }

    /// Open a tab, optionally loading `url`, and make it current.
    pub async fn open_new_tab(
        &mut self,
        url: Option<&str>,
        purpose: Option<String>,
    ) -> Result<TabReport, FatalError> {
        self.guard.check("open_new_tab")?;
        let before = self.current_page_id();
        let timeout = self.navigation_timeout();
        let result = self
            .tabs
            .open(self.browser.as_ref(), url, purpose, timeout)
            .await;

        let result = result.map(|index| {
            let mut report = self.tab_report(Some(index), format!("Opened tab {}", index));
            report.url = url.map(str::to_string);
            report
        });
        Ok(self.settle_tab_change(before, result))
    }

    pub async fn switch_to_tab(&mut self, index: usize) -> Result<TabReport, FatalError> {
        self.guard.check("switch_to_tab")?;
        let before = self.current_page_id();
        let result = self
            .tabs
            .switch(index)
            .await
            .map(|()| self.tab_report(Some(index), format!("Switched to tab {}", index)));
        Ok(self.settle_tab_change(before, result))
    }

    /// Close tab `index`, or the current tab. The last tab cannot be closed.
    pub async fn close_tab(&mut self, index: Option<usize>) -> Result<TabReport, FatalError> {
        self.guard.check("close_tab")?;
        let before = self.current_page_id();
        let result = self
            .tabs
            .close(self.browser.as_ref(), index)
            .await
            .map(|closed| self.tab_report(Some(closed), format!("Closed tab {}", closed)));
        Ok(self.settle_tab_change(before, result))
    }

    pub async fn list_tabs(&self) -> Result<TabList, FatalError> {
        self.guard.check("list_tabs")?;
        Ok(TabList {
            success: true,
            tabs: self.tabs.list().await,
            current_tab: self.tabs.current_index(),
            total_tabs: self.tabs.count(),
        })
    }

    pub async fn next_tab(&mut self) -> Result<TabReport, FatalError> {
        self.guard.check("next_tab")?;
        let before = self.current_page_id();
        let result = self
            .tabs
            .next()
            .await
            .map(|index| self.tab_report(Some(index), format!("Switched to tab {}", index)));
        Ok(self.settle_tab_change(before, result))
    }

    pub async fn previous_tab(&mut self) -> Result<TabReport, FatalError> {
        self.guard.check("previous_tab")?;
        let before = self.current_page_id();
        let result = self
            .tabs
            .previous()
            .await
            .map(|index| self.tab_report(Some(index), format!("Switched to tab {}", index)));
        Ok(self.settle_tab_change(before, result))
    }

    pub async fn close_other_tabs(&mut self) -> Result<TabReport, FatalError> {
        self.guard.check("close_other_tabs")?;
        let before = self.current_page_id();
        let closed = self.tabs.close_others(self.browser.as_ref()).await;
        let report = self.tab_report(Some(0), format!("Closed {} other tabs", closed));
        Ok(self.settle_tab_change(before, Ok(report)))
    }

    /// Open the URL of tab `index` (default current) in a new current tab.
    pub async fn duplicate_tab(&mut self, index: Option<usize>) -> Result<TabReport, FatalError> {
        self.guard.check("duplicate_tab")?;
        let before = self.current_page_id();
        let timeout = self.navigation_timeout();
        let result = self
            .tabs
            .duplicate(self.browser.as_ref(), index, timeout)
            .await;
        let result = match result {
            Ok(new_index) => {
                let url = self.tabs.current_page().url().await.ok();
                let mut report =
                    self.tab_report(Some(new_index), format!("Duplicated into tab {}", new_index));
                report.url = url;
                Ok(report)
            }
            Err(e) => Err(e),
        };
        Ok(self.settle_tab_change(before, result))
    }

    pub async fn get_navigation_context(&self) -> Result<ContextReport, FatalError> {
        self.guard.check("get_navigation_context")?;
        Ok(ContextReport {
            success: true,
            context: self.tabs.navigation_context().await,
        })
    }
}
