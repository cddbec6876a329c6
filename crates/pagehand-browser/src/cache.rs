//! Latest-snapshot element cache.
//!
//! Actions address elements by `nodeId` within the most recent successful
//! snapshot. Taking a new snapshot replaces the whole cache.

use tracing::debug;

use crate::error::ActionError;
use crate::snapshot::{InteractiveElement, Snapshot};

#[derive(Debug, Default)]
pub struct ElementCache {
    latest: Option<Snapshot>,
    next_id: u64,
}

impl ElementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next snapshot id. Ids are never reused.
    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Replace the cache with `snapshot`. Error snapshots are ignored.
    pub fn store(&mut self, snapshot: &Snapshot) {
        if snapshot.is_error() {
            debug!(snapshot_id = snapshot.snapshot_id, "Not caching failed snapshot");
            return;
        }
        self.latest = Some(snapshot.clone());
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }

    pub fn resolve(&self, node_id: usize) -> Result<&InteractiveElement, ActionError> {
        let snapshot = self.latest.as_ref().ok_or(ActionError::NotReady)?;
        snapshot.element(node_id).ok_or(ActionError::NotFound(node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ElementAttributes, ElementKind, ElementSource};
    use chrono::Utc;

    fn snapshot(id: u64, names: &[&str]) -> Snapshot {
        Snapshot {
            snapshot_id: id,
            timestamp: Utc::now(),
            elements: names
                .iter()
                .enumerate()
                .map(|(i, name)| InteractiveElement {
                    node_id: i,
                    kind: ElementKind::Clickable,
                    name: name.to_string(),
                    role: "button".to_string(),
                    rect: None,
                    attributes: ElementAttributes {
                        value: String::new(),
                        description: String::new(),
                        depth: 0,
                        source: ElementSource::Accessibility,
                        tag: None,
                        input_type: None,
                    },
                })
                .collect(),
            hierarchical_structure: String::new(),
            processing_time_ms: 0,
            error: None,
        }
    }

    #[test]
    fn test_resolve_before_any_snapshot() {
        let cache = ElementCache::new();
        assert_eq!(cache.resolve(0).unwrap_err(), ActionError::NotReady);
    }

    #[test]
    fn test_new_snapshot_replaces_old() {
        let mut cache = ElementCache::new();
        cache.store(&snapshot(1, &["A", "B", "C"]));
        assert_eq!(cache.resolve(2).unwrap().name, "C");

        cache.store(&snapshot(2, &["X"]));
        assert_eq!(cache.resolve(0).unwrap().name, "X");
        assert_eq!(cache.resolve(2).unwrap_err(), ActionError::NotFound(2));
    }

    #[test]
    fn test_failed_snapshot_keeps_previous() {
        let mut cache = ElementCache::new();
        cache.store(&snapshot(1, &["A"]));
        cache.store(&Snapshot::failed(2, "boom", 0));
        assert_eq!(cache.latest().unwrap().snapshot_id, 1);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut cache = ElementCache::new();
        let a = cache.next_id();
        let b = cache.next_id();
        assert!(b > a);
    }
}
