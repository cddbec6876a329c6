//! Page-state snapshots.
//!
//! A snapshot merges an accessibility-tree walk with a DOM heuristic scan
//! into one classified, deduplicated list of interactive elements whose
//! `nodeId`s are their positions in the list.

mod builder;
mod dom;
mod hierarchy;
mod model;

pub use builder::SnapshotBuilder;
pub use hierarchy::build_hierarchy;
pub use model::{ElementAttributes, ElementKind, ElementSource, InteractiveElement, RoleClass, Snapshot};
