//! Snapshot construction.

use std::time::Duration;

use chrono::Utc;
use pagehand_config::Config;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::dom;
use super::hierarchy::build_hierarchy;
use super::model::{ElementAttributes, ElementSource, InteractiveElement, RoleClass, Snapshot};
use crate::driver::{AxNode, DriverError, Locator, PageDriver, Rect, Viewport};
use crate::readiness::wait_ready;
use crate::scripts;

/// Accessibility node that classified as interactive.
struct Candidate<'t> {
    node: &'t AxNode,
    depth: usize,
}

/// Builds one snapshot of one page.
pub struct SnapshotBuilder<'a> {
    page: &'a dyn PageDriver,
    config: &'a Config,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(page: &'a dyn PageDriver, config: &'a Config) -> Self {
        Self { page, config }
    }

    /// Build a snapshot. Failures come back as a snapshot carrying `error`.
    pub async fn build(&self, snapshot_id: u64, viewport_only: bool) -> Snapshot {
        let started = Instant::now();

        wait_ready(self.page, &self.config.readiness).await;

        let tree = match self.fetch_tree().await {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Snapshot {} failed: {}", snapshot_id, e);
                return Snapshot::failed(
                    snapshot_id,
                    format!("Failed to read accessibility tree: {}", e),
                    elapsed_ms(started),
                );
            }
        };

        let viewport = match self.page.viewport().await {
            Ok(viewport) => viewport,
            Err(e) => {
                debug!("Viewport query failed, using configured size: {}", e);
                Viewport {
                    width: self.config.browser.viewport_width,
                    height: self.config.browser.viewport_height,
                }
            }
        };
        let filter = viewport_only.then_some(&viewport);

        let mut elements = Vec::new();
        if let Some(root) = &tree {
            let mut candidates = Vec::new();
            collect(root, 0, &mut candidates);
            for candidate in candidates {
                let node = candidate.node;
                let rect = if node.name.trim().is_empty() {
                    None
                } else {
                    self.resolve_rect(&node.role, &node.name).await
                };
                if let Some(viewport) = filter {
                    match &rect {
                        Some(r) if r.in_viewport(viewport) => {}
                        _ => continue,
                    }
                }
                let Some(kind) = RoleClass::of(&node.role).kind() else {
                    continue;
                };
                elements.push(InteractiveElement {
                    node_id: elements.len(),
                    kind,
                    name: node.name.clone(),
                    role: node.role.clone(),
                    rect,
                    attributes: ElementAttributes {
                        value: node.value.clone(),
                        description: node.description.clone(),
                        depth: candidate.depth,
                        source: ElementSource::Accessibility,
                        tag: None,
                        input_type: None,
                    },
                });
            }
        } else {
            debug!("Accessibility tree empty after retries");
        }
        let from_tree = elements.len();

        let scan = self
            .page
            .evaluate(&scripts::dom_scan())
            .await
            .and_then(|v| dom::parse_scan(v).map_err(DriverError::from));
        match scan {
            Ok(candidates) => {
                let added = dom::merge(&mut elements, candidates, filter);
                debug!(added, "DOM scan merged");
            }
            Err(e) => warn!("DOM scan failed, keeping accessibility results: {}", e),
        }

        let hierarchical_structure =
            build_hierarchy(&elements, self.config.snapshot.hierarchy_line_cap);
        let processing_time_ms = elapsed_ms(started);
        info!(
            snapshot_id,
            elements = elements.len(),
            from_tree,
            processing_time_ms,
            "Snapshot built"
        );

        Snapshot {
            snapshot_id,
            timestamp: Utc::now(),
            elements,
            hierarchical_structure,
            processing_time_ms,
            error: None,
        }
    }

    /// Read the accessibility tree with backoff.
    ///
    /// An empty answer is retried with a linear delay, an error with an
    /// exponential one. Only an error on the final attempt is returned.
    async fn fetch_tree(&self) -> Result<Option<AxNode>, DriverError> {
        let attempts = self.config.snapshot.max_ax_attempts.max(1);
        for attempt in 0..attempts {
            match self.page.accessibility_tree().await {
                Ok(Some(tree)) => return Ok(Some(tree)),
                Ok(None) => {
                    if attempt + 1 < attempts {
                        let delay = Duration::from_millis(1000 * u64::from(attempt + 1));
                        debug!(attempt, "Accessibility tree empty, retrying in {:?}", delay);
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => {
                    if attempt + 1 >= attempts {
                        return Err(e);
                    }
                    let delay = Duration::from_millis(1000 * 2u64.pow(attempt));
                    warn!(attempt, "Accessibility tree read failed, retrying in {:?}: {}", delay, e);
                    tokio::time::sleep(delay).await;
                }
            }
        }
        Ok(None)
    }

    /// Bounding box by role+name, then text, then label.
    ///
    /// A locator with no match at all is skipped without waiting; only an
    /// element that exists but is not yet visible gets the locate timeout.
    async fn resolve_rect(&self, role: &str, name: &str) -> Option<Rect> {
        let timeout = Duration::from_millis(self.config.snapshot.locate_timeout_ms);
        let locators = [
            Locator::role(role, name),
            Locator::text(name),
            Locator::label(name),
        ];
        for locator in &locators {
            match self.page.count(locator).await {
                Ok(0) => continue,
                Ok(_) => {}
                Err(e) => {
                    debug!(kind = locator.kind(), "Count failed for '{}': {}", name, e);
                    continue;
                }
            }
            match self.page.locate(locator, timeout, false).await {
                Ok(Some(rect)) => return Some(rect),
                Ok(None) => {}
                Err(e) => debug!(kind = locator.kind(), "Locate failed for '{}': {}", name, e),
            }
        }
        None
    }
}

/// Pre-order walk collecting interactive nodes.
fn collect<'t>(node: &'t AxNode, depth: usize, out: &mut Vec<Candidate<'t>>) {
    if RoleClass::of(&node.role).kind().is_some() {
        out.push(Candidate { node, depth });
    }
    for child in &node.children {
        collect(child, depth + 1, out);
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
