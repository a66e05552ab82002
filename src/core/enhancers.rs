//! Hover effects and animation rules. Cosmetic only.

use crate::core::page::{BUTTON_CLASS, CLIENTS_TABLE_CLASS};
use crate::dom::{Document, NodeId};

pub const ANIMATION_CSS: &str = r#"
@keyframes fadeIn {
    from { opacity: 0; transform: translateY(-10px); }
    to { opacity: 1; transform: translateY(0); }
}

@keyframes slideIn {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}

@keyframes slideOut {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}

.recomendacion-container {
    animation: fadeIn 0.5s ease;
}

#recomendacionResultado {
    animation: fadeIn 0.5s ease;
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hover {
    TableRow,
    Button,
    RecommendButton,
}

impl Hover {
    pub fn apply(self, doc: &mut Document, node: NodeId, entering: bool) {
        let styles: &[(&str, &str)] = match (self, entering) {
            (Hover::TableRow, true) => &[
                ("transform", "translateX(5px)"),
                ("transition", "transform 0.2s ease"),
            ],
            (Hover::TableRow, false) => &[("transform", "translateX(0)")],
            (Hover::Button, true) => &[
                ("transform", "translateY(-3px)"),
                ("box-shadow", "0 6px 12px rgba(0,0,0,0.15)"),
            ],
            (Hover::Button, false) => &[("transform", "translateY(0)"), ("box-shadow", "none")],
            (Hover::RecommendButton, true) => &[
                ("background-color", "#138496"),
                ("transform", "translateY(-2px)"),
            ],
            (Hover::RecommendButton, false) => &[
                ("background-color", "#17a2b8"),
                ("transform", "translateY(0)"),
            ],
        };
        for (property, value) in styles {
            doc.set_style(node, property, value);
        }
    }
}

/// Body rows of every `.clients-table`.
pub fn table_rows(doc: &Document) -> Vec<NodeId> {
    doc.elements_by_class(CLIENTS_TABLE_CLASS)
        .into_iter()
        .flat_map(|table| doc.descendants_by_tag(table, "tbody"))
        .flat_map(|tbody| doc.descendants_by_tag(tbody, "tr"))
        .collect()
}

pub fn buttons(doc: &Document) -> Vec<NodeId> {
    doc.elements_by_class(BUTTON_CLASS)
}

/// Appends the keyframe rules to `<head>`.
pub fn inject_animations(doc: &mut Document) -> Option<NodeId> {
    let Some(head) = doc.head() else {
        tracing::warn!("Page has no <head>; animation rules not injected");
        return None;
    };
    let style = doc.create_element("style");
    doc.set_text(style, ANIMATION_CSS);
    doc.append_child(head, style);
    Some(style)
}
