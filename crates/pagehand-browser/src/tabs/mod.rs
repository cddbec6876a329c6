//! Open pages, the current-tab pointer and navigation bookkeeping.

mod history;
mod manager;
mod tab;

use thiserror::Error;

pub use history::{NavigationEvent, NavigationHistory};
pub use manager::{NavigationContext, TabInfo, TabManager};
pub use tab::Tab;

use crate::driver::DriverError;

#[derive(Debug, Error)]
pub enum TabError {
    #[error("Tab index {index} out of range (0..{count})")]
    OutOfRange { index: usize, count: usize },

    #[error("Cannot close the last remaining tab")]
    LastTab,

    #[error(transparent)]
    Driver(#[from] DriverError),
}
