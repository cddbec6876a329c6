use tracing::{info, warn};

use super::strategy::{Strategy, first_success};
use super::{ActionDispatcher, ActionOutcome, POST_FILL_SETTLE};
use crate::driver::Locator;
use crate::error::ActionError;
use crate::snapshot::InteractiveElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStrategy {
    RoleNameFill,
    LabelFill,
    /// Click the midpoint, select all, type.
    ClickAndType,
}

impl InputStrategy {
    pub const ALL: [InputStrategy; 3] = [
        InputStrategy::RoleNameFill,
        InputStrategy::LabelFill,
        InputStrategy::ClickAndType,
    ];
}

impl Strategy for InputStrategy {
    fn name(&self) -> &'static str {
        match self {
            InputStrategy::RoleNameFill => "role_name_fill",
            InputStrategy::LabelFill => "label_fill",
            InputStrategy::ClickAndType => "click_and_type",
        }
    }
}

impl ActionDispatcher<'_> {
    /// Replace the text of a typeable element.
    ///
    /// A field that still looks empty afterwards is reported through
    /// `verified: false` without failing the action.
    pub async fn input_text(&self, node_id: usize, text: &str) -> ActionOutcome {
        let element = match self.resolve(node_id) {
            Ok(element) => element,
            Err(e) => return ActionOutcome::failed(&e),
        };
        self.pause().await;

        let target = &element;
        let result = first_success("input_text", &InputStrategy::ALL, move |strategy| {
            self.try_input(strategy, target, text)
        })
        .await;

        match result {
            Ok((strategy, ())) => {
                tokio::time::sleep(POST_FILL_SETTLE).await;
                let verified = self.value_at(&element).await.is_some();
                if verified {
                    info!(node_id, strategy = strategy.name(), "Filled '{}'", element.name);
                } else {
                    warn!(
                        node_id,
                        strategy = strategy.name(),
                        "No value found near '{}' after input",
                        element.name
                    );
                }
                let mut outcome = ActionOutcome::succeeded(strategy.name());
                outcome.verified = Some(verified);
                outcome
            }
            Err(e) => {
                warn!(node_id, "Input failed: {}", e);
                ActionOutcome::failed(&e)
            }
        }
    }

    async fn try_input(
        &self,
        strategy: InputStrategy,
        element: &InteractiveElement,
        text: &str,
    ) -> Result<Option<()>, ActionError> {
        let named = !element.name.trim().is_empty();
        match strategy {
            InputStrategy::RoleNameFill if named => {
                let locator = Locator::role(&element.role, &element.name);
                Ok(self
                    .page
                    .fill(&locator, text, self.locator_timeout())
                    .await?
                    .then_some(()))
            }
            InputStrategy::LabelFill if named => {
                let locator = Locator::label(&element.name);
                Ok(self
                    .page
                    .fill(&locator, text, self.locator_timeout())
                    .await?
                    .then_some(()))
            }
            InputStrategy::ClickAndType => {
                let Some(rect) = element.rect else {
                    return Ok(None);
                };
                let (x, y) = rect.center();
                self.click_point(x, y).await?;
                tokio::time::sleep(Self::ms(self.config.type_delay_ms)).await;
                self.page.press_key("Control+a").await?;
                self.page.type_text(text).await?;
                Ok(Some(()))
            }
            _ => Ok(None),
        }
    }
}
