use tracing::{info, warn};

use super::strategy::{Strategy, first_success};
use super::{ActionDispatcher, ActionOutcome, is_toggle};
use crate::driver::Locator;
use crate::error::ActionError;
use crate::snapshot::InteractiveElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStrategy {
    /// Role and accessible name.
    RoleName,
    /// Center of the snapshot bounding box.
    Midpoint,
    /// Visible text.
    Text,
}

impl ClickStrategy {
    pub const ALL: [ClickStrategy; 3] = [
        ClickStrategy::RoleName,
        ClickStrategy::Midpoint,
        ClickStrategy::Text,
    ];
}

impl Strategy for ClickStrategy {
    fn name(&self) -> &'static str {
        match self {
            ClickStrategy::RoleName => "role_name",
            ClickStrategy::Midpoint => "midpoint",
            ClickStrategy::Text => "text",
        }
    }
}

impl ActionDispatcher<'_> {
    /// Click an element of the latest snapshot.
    ///
    /// With `verify_toggle`, an already checked checkbox, radio or switch is
    /// left alone.
    pub async fn click(&self, node_id: usize, verify_toggle: bool) -> ActionOutcome {
        let element = match self.resolve(node_id) {
            Ok(element) => element,
            Err(e) => return ActionOutcome::failed(&e),
        };
        self.pause().await;

        let toggle = is_toggle(&element.role);
        let pre_state = if toggle {
            let state = self.read_state(&element).await;
            if verify_toggle && state.checked == Some(true) {
                info!(node_id, "'{}' is already checked, not clicking", element.name);
                return ActionOutcome::skipped(state, "already checked");
            }
            Some(state)
        } else {
            None
        };

        let target = &element;
        let result = first_success("click", &ClickStrategy::ALL, move |strategy| {
            self.try_click(strategy, target)
        })
        .await;

        match result {
            Ok((strategy, ())) => {
                self.click_settle().await;
                info!(node_id, strategy = strategy.name(), "Clicked '{}'", element.name);
                let mut outcome = ActionOutcome::succeeded(strategy.name());
                if toggle {
                    outcome.pre_state = pre_state;
                    outcome.post_state = Some(self.read_state(&element).await);
                }
                outcome
            }
            Err(e) => {
                warn!(node_id, "Click failed: {}", e);
                ActionOutcome::failed(&e)
            }
        }
    }

    async fn try_click(
        &self,
        strategy: ClickStrategy,
        element: &InteractiveElement,
    ) -> Result<Option<()>, ActionError> {
        let named = !element.name.trim().is_empty();
        match strategy {
            ClickStrategy::RoleName if named => {
                self.click_locator(&Locator::role(&element.role, &element.name), self.locator_timeout())
                    .await
            }
            ClickStrategy::Midpoint => {
                let Some(rect) = element.rect else {
                    return Ok(None);
                };
                let (x, y) = rect.center();
                self.click_point(x, y).await?;
                Ok(Some(()))
            }
            ClickStrategy::Text if named => {
                self.click_locator(&Locator::text(&element.name), self.locator_timeout())
                    .await
            }
            _ => Ok(None),
        }
    }
}
