use std::time::Duration;

use tracing::{info, warn};

use super::strategy::{Strategy, first_success};
use super::{ActionDispatcher, ActionOutcome};
use crate::driver::Locator;
use crate::error::ActionError;

/// Elements commonly clicked by their caption.
const CLICKABLE_SELECTORS: &[&str] = &[
    "button",
    "[role='button']",
    "input[type='submit']",
    "input[type='button']",
    "a",
    "[role='link']",
    "label",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextClickStrategy {
    ButtonRole,
    LinkRole,
    Text,
    CssHasText,
}

impl TextClickStrategy {
    pub const ALL: [TextClickStrategy; 4] = [
        TextClickStrategy::ButtonRole,
        TextClickStrategy::LinkRole,
        TextClickStrategy::Text,
        TextClickStrategy::CssHasText,
    ];

    /// Strategies applicable to an optional element type hint.
    pub fn for_type(element_type: Option<&str>) -> Vec<TextClickStrategy> {
        Self::ALL
            .into_iter()
            .filter(|s| {
                !matches!(
                    (s, element_type),
                    (TextClickStrategy::LinkRole, Some("button"))
                        | (TextClickStrategy::ButtonRole, Some("link"))
                )
            })
            .collect()
    }
}

impl Strategy for TextClickStrategy {
    fn name(&self) -> &'static str {
        match self {
            TextClickStrategy::ButtonRole => "button_role",
            TextClickStrategy::LinkRole => "link_role",
            TextClickStrategy::Text => "text",
            TextClickStrategy::CssHasText => "css_has_text",
        }
    }
}

impl ActionDispatcher<'_> {
    /// Click the first visible element showing `text`, without a snapshot.
    ///
    /// Every probe is a single immediate lookup.
    pub async fn click_by_text(&self, text: &str, element_type: Option<&str>) -> ActionOutcome {
        if text.trim().is_empty() {
            return ActionOutcome::failed(&ActionError::StrategyExhausted {
                action: "click_by_text".to_string(),
                detail: "empty text".to_string(),
            });
        }
        self.pause().await;

        let strategies = TextClickStrategy::for_type(element_type);
        let result = first_success("click_by_text", &strategies, move |strategy| {
            self.try_text_click(strategy, text)
        })
        .await;

        match result {
            Ok((strategy, ())) => {
                self.click_settle().await;
                info!(strategy = strategy.name(), "Clicked text '{}'", text);
                ActionOutcome::succeeded(strategy.name())
            }
            Err(e) => {
                warn!("Click by text '{}' failed: {}", text, e);
                ActionOutcome::failed(&e)
            }
        }
    }

    async fn try_text_click(
        &self,
        strategy: TextClickStrategy,
        text: &str,
    ) -> Result<Option<()>, ActionError> {
        match strategy {
            TextClickStrategy::ButtonRole => {
                self.click_locator(&Locator::role("button", text), Duration::ZERO)
                    .await
            }
            TextClickStrategy::LinkRole => {
                self.click_locator(&Locator::role("link", text), Duration::ZERO)
                    .await
            }
            TextClickStrategy::Text => self.click_locator(&Locator::text(text), Duration::ZERO).await,
            TextClickStrategy::CssHasText => {
                for selector in CLICKABLE_SELECTORS {
                    let locator = Locator::css_with_text(*selector, text);
                    if self.click_locator(&locator, Duration::ZERO).await?.is_some() {
                        return Ok(Some(()));
                    }
                }
                Ok(None)
            }
        }
    }
}
