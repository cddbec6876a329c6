//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_engine;

pub use schema_engine::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Base directory for pagehand state (`~/.pagehand`).
pub fn pagehand_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".pagehand")
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default)]
    pub actions: ActionConfig,

    #[serde(default)]
    pub tabs: TabsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Browser launch and connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default)]
    pub headless: bool,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Persistent profile directory. Defaults to `~/.pagehand/profile`.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    /// Explicit browser executable. Auto-detected when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Launch a browser when none answers on `debug_port`.
    #[serde(default = "default_true")]
    pub auto_launch: bool,

    #[serde(default = "default_launch_timeout")]
    pub launch_timeout_secs: u64,

    /// Per-command timeout on the DevTools connection.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

fn default_debug_port() -> u16 {
    9222
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    800
}

fn default_launch_timeout() -> u64 {
    30
}

fn default_command_timeout() -> u64 {
    30
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: false,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            profile_dir: None,
            chrome_path: None,
            auto_launch: default_true(),
            launch_timeout_secs: default_launch_timeout(),
            command_timeout_secs: default_command_timeout(),
        }
    }
}

impl BrowserConfig {
    pub fn resolved_profile_dir(&self) -> PathBuf {
        self.profile_dir
            .clone()
            .unwrap_or_else(|| pagehand_home().join("profile"))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files. Defaults to `~/.pagehand/logs`.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Emit JSON lines to the log file instead of plain text.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    "pagehand.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            file_prefix: default_file_prefix(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| pagehand_home().join("logs"))
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
