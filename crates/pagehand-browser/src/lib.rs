//! # Pagehand Browser
//!
//! Snapshot-indexed action engine for driving a live page on behalf of an
//! automated caller.
//!
//! A [`Snapshot`] lists what is interactable right now, each element gets a
//! short-lived `nodeId`, and actions addressed by `nodeId` are carried out with
//! several fallback strategies. All driver traffic happens on one dedicated
//! thread owned by a [`BrowserWorker`]; callers talk to it through a
//! [`WorkerHandle`] or the [`toolset`] built on top of it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let config = pagehand_config::Config::default();
//! let worker = BrowserWorker::spawn(config).await?;
//! let tools = toolset(worker.handle());
//! ```

pub mod affinity;
pub mod cache;
pub mod cdp;
pub mod controller;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod readiness;
mod scripts;
pub mod snapshot;
pub mod tabs;
pub mod tools;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::BrowserController;
pub use driver::{BrowserDriver, DriverError, Locator, PageDriver, Rect, Viewport};
pub use error::{ActionError, FatalError};
pub use snapshot::{ElementKind, InteractiveElement, RoleClass, Snapshot};
pub use tools::toolset;
pub use worker::{BrowserWorker, WorkerHandle};
