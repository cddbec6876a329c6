//! Common utility types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata map type.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Risk level of a tool, from the point of view of page side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Read-only: snapshots, state probes, screenshots.
    #[default]
    Low,
    /// Mutates the page: clicks, typing, navigation.
    Medium,
    /// Destroys session state: closing tabs.
    High,
}
