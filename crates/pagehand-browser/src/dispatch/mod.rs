//! nodeId-addressed actions.
//!
//! Each action resolves its element against the latest snapshot, then walks
//! an ordered list of strategies until one succeeds. Nothing is retried
//! across calls and nothing here returns `Err`: failures are folded into
//! [`ActionOutcome`]s.

mod click;
mod date;
mod dropdown;
mod form_errors;
mod input;
mod outcome;
mod state;
mod strategy;
mod text;

use std::future::Future;
use std::time::Duration;

use pagehand_config::ActionConfig;
use tracing::debug;

pub use click::ClickStrategy;
pub use date::{DateStrategy, parse_date};
pub use dropdown::DropdownStrategy;
pub use input::InputStrategy;
pub use outcome::{ActionOutcome, ElementState, FormErrorReport};
pub use strategy::{Strategy, first_success};
pub use text::TextClickStrategy;

use crate::cache::ElementCache;
use crate::driver::{DriverError, Locator, PageDriver, Rect};
use crate::error::ActionError;
use crate::snapshot::InteractiveElement;

/// Settle time after a value was written into a field.
const POST_FILL_SETTLE: Duration = Duration::from_millis(300);

/// Roles whose click flips a checked state.
fn is_toggle(role: &str) -> bool {
    matches!(role, "checkbox" | "radio" | "switch")
}

/// Locator addressing `element` on the live page, if it can be addressed.
pub(crate) fn element_locator(element: &InteractiveElement) -> Option<Locator> {
    if !element.name.trim().is_empty() {
        return Some(Locator::role(&element.role, &element.name));
    }
    element.rect.map(|rect| {
        let (x, y) = rect.center();
        Locator::point(x, y)
    })
}

/// Executes actions against the current page.
pub struct ActionDispatcher<'a> {
    page: &'a dyn PageDriver,
    cache: &'a ElementCache,
    config: &'a ActionConfig,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(page: &'a dyn PageDriver, cache: &'a ElementCache, config: &'a ActionConfig) -> Self {
        Self {
            page,
            cache,
            config,
        }
    }

    fn resolve(&self, node_id: usize) -> Result<InteractiveElement, ActionError> {
        self.cache.resolve(node_id).cloned()
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn locator_timeout(&self) -> Duration {
        Self::ms(self.config.locator_timeout_ms)
    }

    /// Fixed pause before interacting with the page.
    async fn pause(&self) {
        tokio::time::sleep(Self::ms(self.config.pre_action_delay_ms)).await;
    }

    /// Wait for a navigation the click may have started, else just settle.
    async fn click_settle(&self) {
        if let Err(e) = self
            .page
            .wait_for_load(Self::ms(self.config.post_click_load_ms))
            .await
        {
            debug!("No load after click ({}), settling", e);
            tokio::time::sleep(Self::ms(self.config.settle_delay_ms)).await;
        }
    }

    /// Run a driver call under `limit`.
    async fn bounded<T>(
        &self,
        limit: Duration,
        what: &str,
        call: impl Future<Output = Result<T, DriverError>>,
    ) -> Result<T, ActionError> {
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(ActionError::from),
            Err(_) => Err(ActionError::Timeout(format!(
                "{} exceeded {}ms",
                what,
                limit.as_millis()
            ))),
        }
    }

    async fn click_point(&self, x: f64, y: f64) -> Result<(), ActionError> {
        self.bounded(
            Self::ms(self.config.click_timeout_ms),
            "click",
            self.page.click_at(x, y),
        )
        .await
    }

    /// Locate, scroll into view and click the center of the match.
    async fn click_locator(&self, locator: &Locator, timeout: Duration) -> Result<Option<()>, ActionError> {
        let Some(rect) = self.page.locate(locator, timeout, true).await? else {
            return Ok(None);
        };
        let (x, y) = rect.center();
        self.click_point(x, y).await?;
        Ok(Some(()))
    }

    /// Where the element is now, falling back to where the snapshot saw it.
    async fn current_rect(&self, element: &InteractiveElement) -> Option<Rect> {
        if !element.name.trim().is_empty() {
            let locator = Locator::role(&element.role, &element.name);
            if let Ok(Some(rect)) = self.page.locate(&locator, Duration::ZERO, false).await {
                return Some(rect);
            }
        }
        element.rect
    }

    /// Non-empty value of the field at the element's position.
    async fn value_at(&self, element: &InteractiveElement) -> Option<String> {
        let rect = self.current_rect(element).await;
        let script = crate::scripts::value_near(rect.as_ref(), self.config.verification_radius_px);
        match self.page.evaluate(&script).await {
            Ok(serde_json::Value::String(value)) if !value.trim().is_empty() => Some(value),
            Ok(_) => None,
            Err(e) => {
                debug!("Value read failed: {}", e);
                None
            }
        }
    }
}
