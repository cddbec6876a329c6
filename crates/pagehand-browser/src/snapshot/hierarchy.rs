//! Indented text outline of a snapshot, for human or LLM reading.

use super::model::InteractiveElement;

/// One line per element, indented two spaces per depth, at most `max_lines`.
pub fn build_hierarchy(elements: &[InteractiveElement], max_lines: usize) -> String {
    elements
        .iter()
        .take(max_lines)
        .map(|e| {
            let name = if e.name.is_empty() { "[no name]" } else { e.name.as_str() };
            format!(
                "{}- {}: {} (nodeId: {})",
                "  ".repeat(e.attributes.depth),
                e.role,
                name,
                e.node_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ElementAttributes, ElementKind, ElementSource};

    fn element(node_id: usize, role: &str, name: &str, depth: usize) -> InteractiveElement {
        InteractiveElement {
            node_id,
            kind: ElementKind::Clickable,
            name: name.to_string(),
            role: role.to_string(),
            rect: None,
            attributes: ElementAttributes {
                value: String::new(),
                description: String::new(),
                depth,
                source: ElementSource::Accessibility,
                tag: None,
                input_type: None,
            },
        }
    }

    #[test]
    fn test_line_format() {
        let text = build_hierarchy(
            &[element(0, "button", "Save", 1), element(1, "link", "", 2)],
            50,
        );
        assert_eq!(text, "  - button: Save (nodeId: 0)\n    - link: [no name] (nodeId: 1)");
    }

    #[test]
    fn test_capped_lines() {
        let elements: Vec<_> = (0..80).map(|i| element(i, "button", "b", 0)).collect();
        assert_eq!(build_hierarchy(&elements, 50).lines().count(), 50);
    }

    #[test]
    fn test_empty() {
        assert_eq!(build_hierarchy(&[], 50), "");
    }
}
