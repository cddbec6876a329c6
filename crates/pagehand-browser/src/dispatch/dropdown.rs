use std::time::Duration;

use tracing::{info, warn};

use super::strategy::{Strategy, first_success};
use super::{ActionDispatcher, ActionOutcome, element_locator};
use crate::driver::Locator;
use crate::error::ActionError;
use crate::scripts;
use crate::snapshot::InteractiveElement;

/// Where custom dropdowns usually render their options.
const OPTION_SELECTORS: &[&str] = &[
    "[role='option']",
    "[role='menuitem']",
    "[role='listitem']",
    "option",
    "li",
    "div[class*='option']",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownStrategy {
    /// Native `<select>` by option label.
    NativeSelect,
    /// Native `<select>` found by the element's position.
    NearbySelect,
    /// Click to open, then click the option by its text.
    OpenAndPick,
}

impl DropdownStrategy {
    pub const ALL: [DropdownStrategy; 3] = [
        DropdownStrategy::NativeSelect,
        DropdownStrategy::NearbySelect,
        DropdownStrategy::OpenAndPick,
    ];
}

impl Strategy for DropdownStrategy {
    fn name(&self) -> &'static str {
        match self {
            DropdownStrategy::NativeSelect => "native_select",
            DropdownStrategy::NearbySelect => "nearby_select",
            DropdownStrategy::OpenAndPick => "open_and_pick",
        }
    }
}

impl ActionDispatcher<'_> {
    pub async fn select_dropdown_option(&self, node_id: usize, option_text: &str) -> ActionOutcome {
        let element = match self.resolve(node_id) {
            Ok(element) => element,
            Err(e) => return ActionOutcome::failed(&e),
        };
        self.pause().await;

        let target = &element;
        let result = first_success("select_dropdown_option", &DropdownStrategy::ALL, move |strategy| {
            self.try_dropdown(strategy, target, option_text)
        })
        .await;

        match result {
            Ok((strategy, value)) => {
                info!(node_id, strategy = strategy.name(), "Selected '{}'", option_text);
                let mut outcome = ActionOutcome::succeeded(strategy.name());
                outcome.value = Some(value);
                outcome
            }
            Err(e) => {
                warn!(node_id, "Dropdown selection failed: {}", e);
                ActionOutcome::failed(&e)
            }
        }
    }

    async fn try_dropdown(
        &self,
        strategy: DropdownStrategy,
        element: &InteractiveElement,
        option_text: &str,
    ) -> Result<Option<String>, ActionError> {
        match strategy {
            DropdownStrategy::NativeSelect => {
                let Some(locator) = element_locator(element) else {
                    return Ok(None);
                };
                Ok(self
                    .page
                    .select_option(&locator, option_text, self.locator_timeout())
                    .await?)
            }
            DropdownStrategy::NearbySelect => {
                let Some(rect) = element.rect else {
                    return Ok(None);
                };
                let script = scripts::select_near(&rect, self.config.verification_radius_px, option_text);
                Ok(self.page.evaluate(&script).await?.as_str().map(str::to_string))
            }
            DropdownStrategy::OpenAndPick => {
                let opened = match element_locator(element) {
                    Some(locator) => self.click_locator(&locator, self.locator_timeout()).await?,
                    None => None,
                };
                if opened.is_none() {
                    let Some(rect) = element.rect else {
                        return Ok(None);
                    };
                    let (x, y) = rect.center();
                    self.click_point(x, y).await?;
                }
                tokio::time::sleep(Self::ms(self.config.settle_delay_ms)).await;

                for selector in OPTION_SELECTORS {
                    let locator = Locator::css_with_text(*selector, option_text);
                    if self.click_locator(&locator, Duration::ZERO).await?.is_some() {
                        return Ok(Some(option_text.to_string()));
                    }
                }
                Ok(None)
            }
        }
    }
}
