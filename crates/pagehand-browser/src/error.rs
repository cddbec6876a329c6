//! Engine error taxonomy.
//!
//! [`ActionError`] values never escape as `Err`: they are folded into
//! `{success: false, error}` envelopes. [`FatalError`] is the only error the
//! controller returns.

use thiserror::Error;

use crate::driver::DriverError;

/// Soft failures of a single action.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    /// No snapshot has been taken yet.
    #[error("No snapshot available, call get_snapshot first")]
    NotReady,

    /// nodeId absent from the latest snapshot.
    #[error("Element {0} not found in the latest snapshot")]
    NotFound(usize),

    /// Every strategy for the action failed.
    #[error("All strategies failed for {action}: {detail}")]
    StrategyExhausted { action: String, detail: String },

    /// A bounded wait elapsed. The side effect may still have happened.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Unparseable date input.
    #[error("Could not parse date '{0}', expected YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY or MM/DD/YYYY")]
    ParseError(String),

    /// Any other driver-level failure outside a strategy list.
    #[error("{0}")]
    Driver(String),
}

impl ActionError {
    /// Stable machine-readable tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::NotReady => "not_ready",
            ActionError::NotFound(_) => "not_found",
            ActionError::StrategyExhausted { .. } => "strategy_exhausted",
            ActionError::Timeout(_) => "timeout",
            ActionError::ParseError(_) => "parse_error",
            ActionError::Driver(_) => "driver",
        }
    }
}

impl From<DriverError> for ActionError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::Timeout(msg) => ActionError::Timeout(msg),
            other => ActionError::Driver(other.to_string()),
        }
    }
}

/// Unrecoverable failures. Continuing after one is unsafe.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FatalError {
    /// A controller entry point ran on a thread other than the one that
    /// created the driver session.
    #[error("Thread affinity violation in {operation}: owner thread {owner}, caller thread {caller}")]
    ThreadAffinityViolation {
        operation: String,
        owner: String,
        caller: String,
    },

    /// The worker thread could not be started.
    #[error("Browser worker failed to start: {0}")]
    WorkerStartup(String),

    /// The worker thread is gone.
    #[error("Browser worker has stopped")]
    WorkerStopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_kinds() {
        assert_eq!(ActionError::NotReady.kind(), "not_ready");
        assert_eq!(ActionError::NotFound(3).kind(), "not_found");
        assert_eq!(ActionError::ParseError("x".into()).kind(), "parse_error");
    }

    #[test]
    fn test_not_found_message_names_node() {
        assert!(ActionError::NotFound(42).to_string().contains("42"));
    }

    #[test]
    fn test_driver_timeout_maps_to_timeout() {
        let err = ActionError::from(DriverError::Timeout("click".into()));
        assert_eq!(err, ActionError::Timeout("click".into()));

        let err = ActionError::from(DriverError::SessionClosed);
        assert_eq!(err.kind(), "driver");
    }

    #[test]
    fn test_fatal_error_display() {
        let err = FatalError::ThreadAffinityViolation {
            operation: "click".into(),
            owner: "ThreadId(2)".into(),
            caller: "ThreadId(5)".into(),
        };
        let display = err.to_string();
        assert!(display.contains("click"));
        assert!(display.contains("ThreadId(5)"));
    }
}
