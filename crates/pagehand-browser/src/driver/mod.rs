//! Browser driver capability boundary.
//!
//! The engine never talks to a browser directly. Everything it needs from a
//! page (navigation, accessibility tree, script evaluation, locator
//! resolution, input synthesis, screenshots) goes through [`PageDriver`], and
//! page creation goes through [`BrowserDriver`]. The CDP implementation lives
//! in [`crate::cdp`].

mod error;
mod types;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub use error::DriverError;
pub use types::{AxNode, Locator, Rect, Viewport};

/// One open page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Stable identifier of the underlying target.
    fn page_id(&self) -> &str;

    /// Navigate and wait for DOM content loaded.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    async fn url(&self) -> Result<String, DriverError>;

    async fn title(&self) -> Result<String, DriverError>;

    async fn viewport(&self) -> Result<Viewport, DriverError>;

    /// Interesting-only accessibility tree rooted at the document.
    ///
    /// `Ok(None)` means the browser returned nothing usable yet.
    async fn accessibility_tree(&self) -> Result<Option<AxNode>, DriverError>;

    /// Evaluate an expression in the page and return its JSON value.
    async fn evaluate(&self, script: &str) -> Result<Value, DriverError>;

    /// Number of elements matching `locator`, visible or not. Never waits.
    async fn count(&self, locator: &Locator) -> Result<usize, DriverError>;

    /// Resolve the first visible match, polling up to `timeout`.
    ///
    /// With `scroll` the element is scrolled into view first, so the returned
    /// box is clickable.
    async fn locate(
        &self,
        locator: &Locator,
        timeout: Duration,
        scroll: bool,
    ) -> Result<Option<Rect>, DriverError>;

    /// Replace the value of the first visible match. Returns false when
    /// nothing matched within `timeout`.
    async fn fill(&self, locator: &Locator, text: &str, timeout: Duration)
        -> Result<bool, DriverError>;

    /// Select an option of a native `<select>` by its label. Returns the
    /// selected value.
    async fn select_option(
        &self,
        locator: &Locator,
        label: &str,
        timeout: Duration,
    ) -> Result<Option<String>, DriverError>;

    async fn click_at(&self, x: f64, y: f64) -> Result<(), DriverError>;

    /// Type text into the focused element.
    async fn type_text(&self, text: &str) -> Result<(), DriverError>;

    /// Press a key or a `Modifier+Key` combination.
    async fn press_key(&self, key: &str) -> Result<(), DriverError>;

    /// Wait until the document is at least interactive.
    async fn wait_for_load(&self, timeout: Duration) -> Result<(), DriverError>;

    /// Base64-encoded PNG.
    async fn screenshot(&self, full_page: bool) -> Result<String, DriverError>;

    async fn bring_to_front(&self) -> Result<(), DriverError>;

    /// Returns false when there is no history entry to go to.
    async fn go_back(&self) -> Result<bool, DriverError>;

    async fn go_forward(&self) -> Result<bool, DriverError>;

    async fn reload(&self) -> Result<(), DriverError>;
}

/// Page factory for one browser session.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn PageDriver>, DriverError>;

    async fn close_page(&self, page_id: &str) -> Result<(), DriverError>;

    /// Release the browser. Browsers this process did not launch are left
    /// running.
    async fn shutdown(&self) -> Result<(), DriverError> {
        Ok(())
    }
}
