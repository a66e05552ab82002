use super::{Document, NodeId};
use scraper::{ElementRef, Html};

impl Document {
    /// Builds a document from a full HTML page. Parsing is lenient, the same
    /// way a browser recovers from malformed markup.
    pub fn from_html(source: &str) -> Self {
        let parsed = Html::parse_document(source);
        let mut doc = Document::bare();
        let root = doc.root();
        let html = import_element(&mut doc, parsed.root_element());
        doc.append_child(root, html);
        doc
    }
}

fn import_element(doc: &mut Document, source: ElementRef) -> NodeId {
    let element = source.value();
    let node = doc.create_element(element.name());
    for (name, value) in element.attrs() {
        if name == "style" {
            for declaration in value.split(';') {
                if let Some((property, style_value)) = declaration.split_once(':') {
                    doc.set_style(node, property.trim(), style_value.trim());
                }
            }
        } else {
            doc.set_attr(node, name, value);
        }
    }

    for child in source.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let content: &str = text;
                let text_node = doc.create_text(content);
                doc.append_child(node, text_node);
            }
            scraper::Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    let child_node = import_element(doc, child_el);
                    doc.append_child(node, child_node);
                }
            }
            _ => {}
        }
    }

    if element.name() == "textarea" {
        let initial = doc.text_content(node);
        doc.set_value(node, &initial);
    }
    node
}
