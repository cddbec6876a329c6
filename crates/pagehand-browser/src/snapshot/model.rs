//! Snapshot data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::driver::Rect;

/// What the caller can do with an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Clickable,
    Typeable,
    Selectable,
}

/// Classification of an ARIA role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    Clickable,
    Typeable,
    Selectable,
    Ignored,
}

impl RoleClass {
    /// Classify a role. `combobox` is both typeable and selectable and
    /// resolves to typeable.
    pub fn of(role: &str) -> Self {
        match role {
            "button" | "link" | "checkbox" | "radio" | "menuitem" | "tab" | "switch" | "option"
            | "treeitem" => RoleClass::Clickable,
            "textbox" | "searchbox" | "combobox" | "spinbutton" => RoleClass::Typeable,
            "listbox" | "menu" => RoleClass::Selectable,
            _ => RoleClass::Ignored,
        }
    }

    pub fn kind(self) -> Option<ElementKind> {
        match self {
            RoleClass::Clickable => Some(ElementKind::Clickable),
            RoleClass::Typeable => Some(ElementKind::Typeable),
            RoleClass::Selectable => Some(ElementKind::Selectable),
            RoleClass::Ignored => None,
        }
    }
}

/// Which pass discovered an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementSource {
    Accessibility,
    Dom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAttributes {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
    /// Depth in the accessibility tree. DOM-only elements sit at 0.
    pub depth: usize,
    pub source: ElementSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

/// One interactable element of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveElement {
    /// Position in the snapshot. Meaningless outside it.
    pub node_id: usize,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub name: String,
    pub role: String,
    pub rect: Option<Rect>,
    pub attributes: ElementAttributes,
}

impl InteractiveElement {
    /// Key used to recognise the same element found by both passes.
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.role, &self.name, self.rect.as_ref())
    }
}

pub(crate) fn dedup_key(role: &str, name: &str, rect: Option<&Rect>) -> String {
    let position = rect.map(Rect::rounded_key).unwrap_or_else(|| "none".to_string());
    format!("{}:{}:{}", role, name.trim(), position)
}

/// Point-in-time list of interactable elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Monotonic per controller.
    pub snapshot_id: u64,
    pub timestamp: DateTime<Utc>,
    pub elements: Vec<InteractiveElement>,
    pub hierarchical_structure: String,
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Snapshot {
    pub fn failed(snapshot_id: u64, error: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            snapshot_id,
            timestamp: Utc::now(),
            elements: Vec::new(),
            hierarchical_structure: String::new(),
            processing_time_ms,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Element by nodeId. Linear scan.
    pub fn element(&self, node_id: usize) -> Option<&InteractiveElement> {
        self.elements.iter().find(|e| e.node_id == node_id)
    }
}
