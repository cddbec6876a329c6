//! Flat `Accessibility.getFullAXTree` output to a nested [`AxNode`] tree.

use std::collections::HashMap;

use super::protocol::RawAxNode;
use crate::driver::AxNode;

/// Roles that never lead to anything interactive.
const DROPPED_ROLES: &[&str] = &["StaticText", "InlineTextBox", "LineBreak"];

/// Wrapper roles whose children are promoted to the parent.
const TRANSPARENT_ROLES: &[&str] = &["generic", "none", "presentation"];

const MAX_DEPTH: usize = 512;

/// Build the tree. Returns `None` for an empty node list.
pub(crate) fn build_tree(nodes: &[RawAxNode]) -> Option<AxNode> {
    let by_id: HashMap<&str, &RawAxNode> =
        nodes.iter().map(|n| (n.node_id.as_str(), n)).collect();
    let root = nodes
        .iter()
        .find(|n| n.parent_id.is_none())
        .or_else(|| nodes.first())?;

    Some(convert(root, &by_id, 0))
}

fn convert(node: &RawAxNode, by_id: &HashMap<&str, &RawAxNode>, depth: usize) -> AxNode {
    let mut children = Vec::new();
    collect_children(node, by_id, depth, &mut children);

    AxNode {
        role: node.role.as_ref().map(|v| v.text()).unwrap_or_default(),
        name: node.name.as_ref().map(|v| v.text()).unwrap_or_default(),
        value: node.value.as_ref().map(|v| v.text()).unwrap_or_default(),
        description: node.description.as_ref().map(|v| v.text()).unwrap_or_default(),
        children,
    }
}

fn collect_children(
    node: &RawAxNode,
    by_id: &HashMap<&str, &RawAxNode>,
    depth: usize,
    out: &mut Vec<AxNode>,
) {
    if depth >= MAX_DEPTH {
        return;
    }

    for child_id in node.child_ids.iter().flatten() {
        let Some(child) = by_id.get(child_id.as_str()) else {
            continue;
        };
        let role = child.role.as_ref().map(|v| v.text()).unwrap_or_default();

        if DROPPED_ROLES.contains(&role.as_str()) {
            continue;
        }
        if child.ignored || TRANSPARENT_ROLES.contains(&role.as_str()) {
            collect_children(child, by_id, depth + 1, out);
        } else {
            out.push(convert(child, by_id, depth + 1));
        }
    }
}
