//! # Pagehand Protocols
//!
//! Interface definitions shared between the browser engine and whatever
//! drives it (the CLI, or an external tool-calling loop).
//!
//! ## Core Traits
//!
//! - [`Tool`] - A named, schema-described operation the caller can invoke

pub mod error;
pub mod tool;
pub mod types;

pub use error::ToolError;
pub use tool::{ExportFormat, Parameters, Tool, ToolContext, ToolDefinition, ToolResult};
pub use types::*;
