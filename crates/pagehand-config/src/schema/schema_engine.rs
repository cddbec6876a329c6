//! Engine configuration types (snapshot, readiness, actions, tabs).

use serde::{Deserialize, Serialize};

use super::default_true;

/// Snapshot builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Attempts at fetching the accessibility tree.
    #[serde(default = "default_max_ax_attempts")]
    pub max_ax_attempts: u32,

    /// Maximum number of lines in the hierarchy text.
    #[serde(default = "default_hierarchy_line_cap")]
    pub hierarchy_line_cap: usize,

    #[serde(default = "default_true")]
    pub default_viewport_only: bool,

    /// Bounding-box lookup budget per locator while building a snapshot.
    #[serde(default = "default_snapshot_locate_timeout")]
    pub locate_timeout_ms: u64,
}

fn default_max_ax_attempts() -> u32 {
    3
}

fn default_hierarchy_line_cap() -> usize {
    50
}

fn default_snapshot_locate_timeout() -> u64 {
    1_000
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            max_ax_attempts: default_max_ax_attempts(),
            hierarchy_line_cap: default_hierarchy_line_cap(),
            default_viewport_only: default_true(),
            locate_timeout_ms: default_snapshot_locate_timeout(),
        }
    }
}

/// Readiness gate configuration. All values in milliseconds except the
/// mutation threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Wait for the document to become interactive.
    #[serde(default = "default_readiness_timeout")]
    pub timeout_ms: u64,

    /// Wait for `document.body` to exist.
    #[serde(default = "default_body_timeout")]
    pub body_timeout_ms: u64,

    #[serde(default = "default_sample_window")]
    pub sample_window_ms: u64,

    #[serde(default = "default_mutation_threshold")]
    pub mutation_threshold: u64,

    /// Extra wait when the page is still mutating heavily.
    #[serde(default = "default_extra_wait")]
    pub extra_wait_ms: u64,
}

fn default_readiness_timeout() -> u64 {
    30_000
}

fn default_body_timeout() -> u64 {
    5_000
}

fn default_sample_window() -> u64 {
    2_000
}

fn default_mutation_threshold() -> u64 {
    50
}

fn default_extra_wait() -> u64 {
    2_000
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_readiness_timeout(),
            body_timeout_ms: default_body_timeout(),
            sample_window_ms: default_sample_window(),
            mutation_threshold: default_mutation_threshold(),
            extra_wait_ms: default_extra_wait(),
        }
    }
}

/// Action dispatcher configuration. Durations in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Pause before an action and after a successful fill, letting animations settle.
    #[serde(default = "default_pre_action_delay")]
    pub pre_action_delay_ms: u64,

    /// How long a locator may take to become visible.
    #[serde(default = "default_locator_timeout")]
    pub locator_timeout_ms: u64,

    #[serde(default = "default_click_timeout")]
    pub click_timeout_ms: u64,

    /// Wait for DOM content loaded after a click.
    #[serde(default = "default_post_click_load")]
    pub post_click_load_ms: u64,

    /// Flat delay used when the post-click load wait does not complete.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Pause between focusing a field and typing into it.
    #[serde(default = "default_type_delay")]
    pub type_delay_ms: u64,

    /// Pixel radius used to match a DOM field against a snapshot rect.
    #[serde(default = "default_verification_radius")]
    pub verification_radius_px: f64,

    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_ms: u64,

    #[serde(default = "default_key_settle")]
    pub key_settle_ms: u64,

    #[serde(default = "default_scroll_settle")]
    pub scroll_settle_ms: u64,

    /// Maximum characters returned by page content reads.
    #[serde(default = "default_page_text_limit")]
    pub page_text_limit: usize,
}

fn default_pre_action_delay() -> u64 {
    300
}

fn default_locator_timeout() -> u64 {
    5_000
}

fn default_click_timeout() -> u64 {
    5_000
}

fn default_post_click_load() -> u64 {
    3_000
}

fn default_settle_delay() -> u64 {
    500
}

fn default_type_delay() -> u64 {
    200
}

fn default_verification_radius() -> f64 {
    20.0
}

fn default_navigation_timeout() -> u64 {
    30_000
}

fn default_key_settle() -> u64 {
    200
}

fn default_scroll_settle() -> u64 {
    300
}

fn default_page_text_limit() -> usize {
    10_000
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            pre_action_delay_ms: default_pre_action_delay(),
            locator_timeout_ms: default_locator_timeout(),
            click_timeout_ms: default_click_timeout(),
            post_click_load_ms: default_post_click_load(),
            settle_delay_ms: default_settle_delay(),
            type_delay_ms: default_type_delay(),
            verification_radius_px: default_verification_radius(),
            navigation_timeout_ms: default_navigation_timeout(),
            key_settle_ms: default_key_settle(),
            scroll_settle_ms: default_scroll_settle(),
            page_text_limit: default_page_text_limit(),
        }
    }
}

/// Tab manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabsConfig {
    /// Number of recent navigation events considered for domain heuristics.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,

    /// Distinct recent domains at which a new tab is recommended.
    #[serde(default = "default_distinct_domain_threshold")]
    pub distinct_domain_threshold: usize,

    /// Maximum navigation events retained. Oldest are dropped first.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_recent_window() -> usize {
    5
}

fn default_distinct_domain_threshold() -> usize {
    3
}

fn default_history_limit() -> usize {
    1_000
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            recent_window: default_recent_window(),
            distinct_domain_threshold: default_distinct_domain_threshold(),
            history_limit: default_history_limit(),
        }
    }
}
