use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::{info, warn};

use super::strategy::{Strategy, first_success};
use super::{ActionDispatcher, ActionOutcome, POST_FILL_SETTLE};
use crate::driver::Locator;
use crate::error::ActionError;
use crate::scripts;
use crate::snapshot::InteractiveElement;

static YEAR_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").expect("valid regex")
});

static YEAR_LAST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"));

/// Parse `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY` or `MM/DD/YYYY`.
///
/// A slash date whose first group exceeds 12 is day-first, anything else is
/// month-first.
pub fn parse_date(input: &str) -> Result<NaiveDate, ActionError> {
    let trimmed = input.trim();
    let invalid = || ActionError::ParseError(input.to_string());
    let number = |s: &str| s.parse::<u32>().map_err(|_| invalid());

    let (year, month, day) = if let Some(caps) = YEAR_FIRST.captures(trimmed) {
        (number(&caps[1])?, number(&caps[2])?, number(&caps[3])?)
    } else if let Some(caps) = YEAR_LAST.captures(trimmed) {
        let first = number(&caps[1])?;
        let second = number(&caps[2])?;
        let year = number(&caps[3])?;
        if first > 12 {
            (year, second, first)
        } else {
            (year, first, second)
        }
    } else {
        return Err(invalid());
    };

    let year = i32::try_from(year).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// Assign the value of the native date input at the element's position.
    DirectValue,
    /// Focus and type month, day and year separated by Tab.
    Keyboard,
    /// Separate month, day and year controls.
    SplitFields,
    /// Fill the first visible native date input.
    NativeFill,
}

impl DateStrategy {
    pub const ALL: [DateStrategy; 4] = [
        DateStrategy::DirectValue,
        DateStrategy::Keyboard,
        DateStrategy::SplitFields,
        DateStrategy::NativeFill,
    ];
}

impl Strategy for DateStrategy {
    fn name(&self) -> &'static str {
        match self {
            DateStrategy::DirectValue => "direct_value",
            DateStrategy::Keyboard => "keyboard",
            DateStrategy::SplitFields => "split_fields",
            DateStrategy::NativeFill => "native_fill",
        }
    }
}

impl ActionDispatcher<'_> {
    /// Set a date field.
    ///
    /// Success is confirmed by reading the value back from the page; an empty
    /// value turns a reported success into a failure.
    pub async fn select_date(&self, node_id: usize, date: &str) -> ActionOutcome {
        let element = match self.resolve(node_id) {
            Ok(element) => element,
            Err(e) => return ActionOutcome::failed(&e),
        };
        let parsed = match parse_date(date) {
            Ok(parsed) => parsed,
            Err(e) => return ActionOutcome::failed(&e),
        };
        self.pause().await;

        let target = &element;
        let result = first_success("select_date", &DateStrategy::ALL, move |strategy| {
            self.try_date(strategy, target, parsed)
        })
        .await;

        let strategy = match result {
            Ok((strategy, ())) => strategy,
            Err(e) => {
                warn!(node_id, "Date selection failed: {}", e);
                return ActionOutcome::failed(&e);
            }
        };

        tokio::time::sleep(POST_FILL_SETTLE).await;
        let iso = parsed.format("%Y-%m-%d").to_string();
        let mut outcome = ActionOutcome::succeeded(strategy.name());
        outcome.value = Some(iso.clone());

        match self.value_at(&element).await {
            Some(value) => {
                info!(node_id, strategy = strategy.name(), "Date set to {} (page shows '{}')", iso, value);
                outcome.verified = Some(true);
                outcome
            }
            None => {
                warn!(node_id, strategy = strategy.name(), "Date field still empty after input");
                outcome.overridden(format!(
                    "Date field is empty after {} reported success",
                    strategy.name()
                ))
            }
        }
    }

    async fn try_date(
        &self,
        strategy: DateStrategy,
        element: &InteractiveElement,
        date: NaiveDate,
    ) -> Result<Option<()>, ActionError> {
        let iso = date.format("%Y-%m-%d").to_string();
        match strategy {
            DateStrategy::DirectValue => {
                let Some(rect) = element.rect else {
                    return Ok(None);
                };
                let script =
                    scripts::set_date_value(&rect, self.config.verification_radius_px, &iso);
                let set = self.page.evaluate(&script).await?;
                Ok((set.as_bool() == Some(true)).then_some(()))
            }
            DateStrategy::Keyboard => {
                let Some(rect) = element.rect else {
                    return Ok(None);
                };
                let (x, y) = rect.center();
                self.click_point(x, y).await?;
                for part in [
                    format!("{:02}", date.month()),
                    format!("{:02}", date.day()),
                    format!("{:04}", date.year()),
                ] {
                    self.page.type_text(&part).await?;
                    self.page.press_key("Tab").await?;
                }
                Ok(Some(()))
            }
            DateStrategy::SplitFields => {
                let script = scripts::date_parts(date.year(), date.month(), date.day());
                let set = self.page.evaluate(&script).await?;
                Ok((set.as_bool() == Some(true)).then_some(()))
            }
            DateStrategy::NativeFill => {
                let locator = Locator::css("input[type='date']");
                Ok(self
                    .page
                    .fill(&locator, &iso, self.locator_timeout())
                    .await?
                    .then_some(()))
            }
        }
    }
}
