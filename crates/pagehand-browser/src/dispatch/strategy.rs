//! Ordered strategy fallback.

use std::fmt::Debug;
use std::future::Future;

use tracing::debug;

use crate::error::ActionError;

/// One way of performing an action.
pub trait Strategy: Copy + Debug {
    /// Short stable name, reported in outcomes.
    fn name(&self) -> &'static str;
}

/// Run `strategies` in order and return the first one that produced a value.
///
/// `Ok(None)` and `Err` both advance to the next strategy. When all of them
/// fail the collected notes end up in [`ActionError::StrategyExhausted`].
pub async fn first_success<S, T, F, Fut>(
    action: &str,
    strategies: &[S],
    mut attempt: F,
) -> Result<(S, T), ActionError>
where
    S: Strategy,
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<Option<T>, ActionError>>,
{
    let mut notes = Vec::with_capacity(strategies.len());
    for &strategy in strategies {
        debug!(action, strategy = strategy.name(), "Trying strategy");
        match attempt(strategy).await {
            Ok(Some(value)) => {
                debug!(action, strategy = strategy.name(), "Strategy succeeded");
                return Ok((strategy, value));
            }
            Ok(None) => notes.push(format!("{}: no match", strategy.name())),
            Err(e) => {
                debug!(action, strategy = strategy.name(), "Strategy failed: {}", e);
                notes.push(format!("{}: {}", strategy.name(), e));
            }
        }
    }

    let detail = if notes.is_empty() {
        "no strategy applicable".to_string()
    } else {
        notes.join("; ")
    };
    Err(ActionError::StrategyExhausted {
        action: action.to_string(),
        detail,
    })
}
