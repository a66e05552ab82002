//! Headless document model.
//!
//! An arena of nodes addressed by [`NodeId`]. Detached nodes stay in the arena
//! so handles never dangle; lookups (`element_by_id`, `elements_by_class`) only
//! consider nodes connected to the document root.

pub mod html;

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    styles: Vec<(String, String)>,
    value: String,
    disabled: bool,
    selected: bool,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty page with `<html>`, `<head>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self::bare();
        let html = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.append_child(doc.root, html);
        doc.append_child(html, head);
        doc.append_child(html, body);
        doc
    }

    pub(crate) fn bare() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> Option<NodeId> {
        self.first_by_tag(self.root, "head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.first_by_tag(self.root, "body")
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.is_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Inserts `node` as the next sibling of `reference`. Returns false when
    /// `reference` has no parent.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> bool {
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        if node == reference || self.is_ancestor(node, parent) || node == parent {
            return false;
        }
        self.detach(node);
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == reference)
            .map(|i| i + 1)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(position, node);
        self.nodes[node.0].parent = Some(parent);
        true
    }

    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.is_ancestor(self.root, node)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.attrs.insert(name.to_string(), value.to_string());
            match name {
                "value" => element.value = value.to_string(),
                "disabled" => element.disabled = true,
                "selected" => element.selected = true,
                _ => {}
            }
        }
    }

    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .map(|c| c.split_ascii_whitespace().any(|name| name == class))
            .unwrap_or(false)
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?
            .styles
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            match element.styles.iter_mut().find(|(name, _)| name == property) {
                Some(entry) => entry.1 = value.to_string(),
                None => element
                    .styles
                    .push((property.to_string(), value.to_string())),
            }
        }
    }

    /// `display` is anything but `none`.
    pub fn is_visible(&self, node: NodeId) -> bool {
        self.style(node, "display") != Some("none")
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Document | NodeKind::Element(_) => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.element(node).map(|e| e.disabled).unwrap_or(false)
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(element) = self.element_mut(node) {
            element.disabled = disabled;
            if disabled {
                element.attrs.insert("disabled".to_string(), String::new());
            } else {
                element.attrs.remove("disabled");
            }
        }
    }

    pub fn is_control(&self, node: NodeId) -> bool {
        matches!(
            self.tag_name(node),
            Some("input") | Some("select") | Some("textarea")
        )
    }

    /// Current value of a control. For `<select>` this is the value of the
    /// selected option.
    pub fn value(&self, node: NodeId) -> String {
        if self.tag_name(node) == Some("select") {
            return self
                .selected_index(node)
                .and_then(|i| self.options(node).get(i).copied())
                .map(|option| self.option_value(option))
                .unwrap_or_default();
        }
        self.element(node)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if self.tag_name(node) == Some("select") {
            if let Some(index) = self
                .options(node)
                .iter()
                .position(|option| self.option_value(*option) == value)
            {
                self.select_index(node, index);
            }
            return;
        }
        if let Some(element) = self.element_mut(node) {
            element.value = value.to_string();
        }
    }

    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|n| self.tag_name(*n) == Some("option"))
            .collect()
    }

    /// An option without a `value` attribute uses its text.
    pub fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(option).trim().to_string(),
        }
    }

    pub fn selected_index(&self, select: NodeId) -> Option<usize> {
        let options = self.options(select);
        if options.is_empty() {
            return None;
        }
        let explicit = options
            .iter()
            .position(|o| self.element(*o).map(|e| e.selected).unwrap_or(false));
        Some(explicit.unwrap_or(0))
    }

    pub fn select_index(&mut self, select: NodeId, index: usize) {
        for (i, option) in self.options(select).into_iter().enumerate() {
            if let Some(element) = self.element_mut(option) {
                element.selected = i == index;
            }
        }
    }

    /// Pre-order descendants, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.id(*n) == Some(id))
    }

    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants_by_class(self.root, class)
    }

    pub fn descendants_by_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    pub fn descendants_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|n| self.tag_name(*n) == Some(tag))
            .collect()
    }

    pub fn first_by_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(node)
            .into_iter()
            .find(|n| self.tag_name(*n) == Some(tag))
    }

    /// Nearest inclusive ancestor carrying `class`.
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// First `input`, `select` or `textarea` below `node`.
    pub fn first_control(&self, node: NodeId) -> Option<NodeId> {
        self.descendants(node)
            .into_iter()
            .find(|n| self.is_control(*n))
    }
}
