//! DOM heuristic pass.
//!
//! Widgets built from plain elements often have no useful accessibility
//! node. The page-side scan finds them by selector and the results are
//! merged behind the accessibility elements, skipping anything already
//! present.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::model::{ElementAttributes, ElementSource, InteractiveElement, RoleClass, dedup_key};
use crate::driver::{Rect, Viewport};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DomCandidate {
    pub role: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub input_type: String,
}

pub(crate) fn parse_scan(value: Value) -> Result<Vec<DomCandidate>, serde_json::Error> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value)
}

/// Append unseen candidates to `elements`, numbering them after the
/// existing ones. Returns how many were added.
pub(crate) fn merge(
    elements: &mut Vec<InteractiveElement>,
    candidates: Vec<DomCandidate>,
    viewport: Option<&Viewport>,
) -> usize {
    let mut seen: HashSet<String> = elements.iter().map(InteractiveElement::dedup_key).collect();
    let before = elements.len();

    for candidate in candidates {
        let Some(kind) = RoleClass::of(&candidate.role).kind() else {
            continue;
        };
        if let Some(viewport) = viewport {
            match &candidate.rect {
                Some(rect) if rect.in_viewport(viewport) => {}
                _ => continue,
            }
        }
        let key = dedup_key(&candidate.role, &candidate.name, candidate.rect.as_ref());
        if !seen.insert(key) {
            continue;
        }

        elements.push(InteractiveElement {
            node_id: elements.len(),
            kind,
            name: candidate.name,
            role: candidate.role,
            rect: candidate.rect,
            attributes: ElementAttributes {
                value: String::new(),
                description: String::new(),
                depth: 0,
                source: ElementSource::Dom,
                tag: Some(candidate.tag).filter(|t| !t.is_empty()),
                input_type: Some(candidate.input_type).filter(|t| !t.is_empty()),
            },
        });
    }

    elements.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn viewport() -> Viewport {
        Viewport {
            width: 1280,
            height: 800,
        }
    }

    #[test]
    fn test_parse_scan_accepts_null() {
        assert!(parse_scan(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_merge_skips_ignored_roles_and_duplicates() {
        let scan = parse_scan(json!([
            {"role": "radio", "name": "Yes", "rect": {"x": 10, "y": 10, "width": 20, "height": 20}, "tag": "div", "inputType": ""},
            {"role": "radio", "name": "Yes", "rect": {"x": 10.3, "y": 9.8, "width": 20, "height": 20}, "tag": "div", "inputType": ""},
            {"role": "heading", "name": "Title", "rect": {"x": 0, "y": 0, "width": 20, "height": 20}},
            {"role": "textbox", "name": "", "rect": {"x": 50, "y": 60, "width": 200, "height": 30}, "tag": "input", "inputType": "text"}
        ]))
        .unwrap();

        let mut elements = Vec::new();
        let added = merge(&mut elements, scan, Some(&viewport()));

        assert_eq!(added, 2);
        assert_eq!(elements[0].node_id, 0);
        assert_eq!(elements[0].attributes.source, ElementSource::Dom);
        assert_eq!(elements[0].attributes.tag.as_deref(), Some("div"));
        assert_eq!(elements[0].attributes.input_type, None);
        assert_eq!(elements[1].node_id, 1);
        assert_eq!(elements[1].attributes.input_type.as_deref(), Some("text"));
    }

    #[test]
    fn test_merge_applies_viewport_filter() {
        let scan = parse_scan(json!([
            {"role": "button", "name": "Below", "rect": {"x": 10, "y": 900, "width": 20, "height": 20}},
            {"role": "button", "name": "Nowhere"}
        ]))
        .unwrap();

        let mut elements = Vec::new();
        assert_eq!(merge(&mut elements, scan.clone(), Some(&viewport())), 0);
        assert_eq!(merge(&mut elements, scan, None), 2);
    }
}
