//! Value types shared by drivers and the engine.

use serde::{Deserialize, Serialize};

/// Bounding box in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when the top-left corner lies inside the viewport.
    pub fn in_viewport(&self, viewport: &Viewport) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x < f64::from(viewport.width)
            && self.y < f64::from(viewport.height)
    }

    /// Position key with coordinates rounded to whole pixels.
    pub fn rounded_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.x.round() as i64,
            self.y.round() as i64,
            self.width.round() as i64,
            self.height.round() as i64
        )
    }
}

/// Visible viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Accessibility tree node with ignored nodes already collapsed into their
/// parents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxNode {
    pub role: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub children: Vec<AxNode>,
}

impl AxNode {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<AxNode>) -> Self {
        self.children = children;
        self
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AxNode::node_count).sum::<usize>()
    }
}

/// How to find an element on the page.
///
/// Text matching is case-insensitive substring matching on whitespace
/// normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Locator {
    /// Implicit or explicit ARIA role plus accessible name.
    Role { role: String, name: String },
    /// Innermost element whose visible text contains the string.
    Text { text: String },
    /// Form control whose label contains the string.
    Label { text: String },
    /// CSS selector, optionally narrowed by contained text.
    Css {
        selector: String,
        #[serde(rename = "hasText", skip_serializing_if = "Option::is_none")]
        has_text: Option<String>,
    },
    /// Topmost element at a viewport point.
    Point { x: f64, y: f64 },
}

impl Locator {
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Locator::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text { text: text.into() }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Locator::Label { text: text.into() }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css {
            selector: selector.into(),
            has_text: None,
        }
    }

    pub fn css_with_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Locator::Css {
            selector: selector.into(),
            has_text: Some(text.into()),
        }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Locator::Point { x, y }
    }

    /// Short name used in logs and outcome reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Locator::Role { .. } => "role",
            Locator::Text { .. } => "text",
            Locator::Label { .. } => "label",
            Locator::Css { .. } => "css",
            Locator::Point { .. } => "point",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.center(), (60.0, 40.0));
    }

    #[test]
    fn test_rect_in_viewport_bounds() {
        let viewport = Viewport { width: 800, height: 600 };
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).in_viewport(&viewport));
        assert!(Rect::new(799.0, 599.0, 10.0, 10.0).in_viewport(&viewport));
        assert!(!Rect::new(800.0, 10.0, 10.0, 10.0).in_viewport(&viewport));
        assert!(!Rect::new(10.0, 600.0, 10.0, 10.0).in_viewport(&viewport));
        assert!(!Rect::new(-1.0, 10.0, 10.0, 10.0).in_viewport(&viewport));
    }

    #[test]
    fn test_rounded_key() {
        let rect = Rect::new(10.4, 19.6, 99.5, 40.0);
        assert_eq!(rect.rounded_key(), "10:20:100:40");
    }

    #[test]
    fn test_locator_serialization() {
        let json = serde_json::to_value(Locator::role("button", "Next")).unwrap();
        assert_eq!(json["kind"], "role");
        assert_eq!(json["name"], "Next");

        let json = serde_json::to_value(Locator::css_with_text("button", "Submit")).unwrap();
        assert_eq!(json["kind"], "css");
        assert_eq!(json["hasText"], "Submit");

        let json = serde_json::to_value(Locator::css("input[type='date']")).unwrap();
        assert!(json.get("hasText").is_none());
    }

    #[test]
    fn test_ax_node_count() {
        let tree = AxNode::new("RootWebArea", "Page").with_children(vec![
            AxNode::new("button", "Ok"),
            AxNode::new("group", "").with_children(vec![AxNode::new("link", "Home")]),
        ]);
        assert_eq!(tree.node_count(), 4);
    }
}
