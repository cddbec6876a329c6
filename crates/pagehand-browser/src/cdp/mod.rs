//! Chrome DevTools Protocol (CDP) driver.
//!
//! A pure Rust CDP client: HTTP endpoint discovery, one WebSocket carrying
//! flattened target sessions, and [`PageDriver`](crate::driver::PageDriver) /
//! [`BrowserDriver`](crate::driver::BrowserDriver) implementations on top.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let browser = CdpBrowser::launch(&config.browser).await?;
//! let page = browser.new_page().await?;
//! page.navigate("https://example.com", Duration::from_secs(30)).await?;
//! ```

mod ax;
mod client;
mod keys;
mod launcher;
mod page;
mod protocol;
mod transport;

pub use client::CdpBrowser;
pub use keys::{KeyChord, KeyDefinition};
pub use launcher::ChromeLauncher;
pub use page::CdpPage;
pub use protocol::*;
