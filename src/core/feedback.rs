//! Floating notifications and the global error banner.

use crate::config::toml_config::NotificationConfig;
use crate::dom::{Document, NodeId};
use crate::domain::model::{Notification, NotificationKind};
use std::time::Instant;

pub const NOTIFICATION_CLASS: &str = "notificacion-flotante";
pub const BANNER_CLASS: &str = "error-global";

#[derive(Debug, Clone)]
struct ActiveNotification {
    node: NodeId,
    notification: Notification,
    shown_at: Instant,
    exiting: bool,
}

#[derive(Debug, Clone)]
pub struct Feedback {
    timing: NotificationConfig,
    active: Vec<ActiveNotification>,
    banner: Option<NodeId>,
}

impl Feedback {
    pub fn new(timing: NotificationConfig) -> Self {
        Self {
            timing,
            active: Vec::new(),
            banner: None,
        }
    }

    /// Appends a floating notification to the body. It starts its exit
    /// animation after the visible period and is removed once that finishes;
    /// both happen in [`sweep`](Self::sweep).
    pub fn notify(
        &mut self,
        doc: &mut Document,
        message: &str,
        kind: NotificationKind,
        now: Instant,
    ) -> NodeId {
        let (icon, icon_color, background, color, border) = match kind {
            NotificationKind::Success => ("check-circle", "#28a745", "#d4edda", "#155724", "#c3e6cb"),
            NotificationKind::Info => ("info-circle", "#17a2b8", "#d1ecf1", "#0c5460", "#bee5eb"),
        };

        let node = doc.create_element("div");
        doc.set_attr(node, "class", NOTIFICATION_CLASS);
        let row = doc.create_element("div");
        for (property, value) in [("display", "flex"), ("align-items", "center"), ("gap", "10px")] {
            doc.set_style(row, property, value);
        }
        let icon_node = doc.create_element("i");
        doc.set_attr(icon_node, "class", &format!("fas fa-{}", icon));
        doc.set_style(icon_node, "color", icon_color);
        let span = doc.create_element("span");
        doc.set_text(span, message);
        doc.append_child(row, icon_node);
        doc.append_child(row, span);
        doc.append_child(node, row);

        let border = format!("1px solid {}", border);
        for (property, value) in [
            ("position", "fixed"),
            ("top", "20px"),
            ("right", "20px"),
            ("padding", "15px 20px"),
            ("background-color", background),
            ("color", color),
            ("border", border.as_str()),
            ("border-radius", "8px"),
            ("box-shadow", "0 4px 12px rgba(0,0,0,0.1)"),
            ("z-index", "1000"),
            ("animation", "slideIn 0.3s ease"),
        ] {
            doc.set_style(node, property, value);
        }

        let parent = doc.body().unwrap_or_else(|| doc.root());
        doc.append_child(parent, node);

        self.active.push(ActiveNotification {
            node,
            notification: Notification {
                message: message.to_string(),
                kind,
            },
            shown_at: now,
            exiting: false,
        });
        node
    }

    /// Advances notification lifetimes to `now`. Returns how many were removed.
    pub fn sweep(&mut self, doc: &mut Document, now: Instant) -> usize {
        let visible = self.timing.visible();
        let lifetime = visible + self.timing.exit();
        let before = self.active.len();

        self.active.retain_mut(|entry| {
            let elapsed = now.saturating_duration_since(entry.shown_at);
            if elapsed >= lifetime {
                doc.remove(entry.node);
                return false;
            }
            if elapsed >= visible && !entry.exiting {
                doc.set_style(entry.node, "animation", "slideOut 0.3s ease");
                entry.exiting = true;
            }
            true
        });

        before - self.active.len()
    }

    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.active.iter().map(|entry| &entry.notification)
    }

    /// Shows `message` in the single global banner, creating it right after
    /// `header` on first use and updating it in place afterwards.
    pub fn show_error(&mut self, doc: &mut Document, header: Option<NodeId>, message: &str) -> NodeId {
        let existing = doc
            .elements_by_class(BANNER_CLASS)
            .first()
            .copied()
            .or(self.banner);

        let banner = match existing {
            Some(banner) => banner,
            None => {
                let banner = doc.create_element("div");
                doc.set_attr(banner, "class", BANNER_CLASS);
                for (property, value) in [
                    ("background-color", "#f8d7da"),
                    ("color", "#721c24"),
                    ("padding", "15px"),
                    ("border-radius", "8px"),
                    ("margin-bottom", "20px"),
                    ("border", "1px solid #f5c6cb"),
                    ("display", "flex"),
                    ("align-items", "center"),
                    ("gap", "10px"),
                ] {
                    doc.set_style(banner, property, value);
                }
                match header {
                    Some(header) if doc.insert_after(header, banner) => {}
                    _ => tracing::warn!("No form header to anchor the error banner"),
                }
                banner
            }
        };
        self.banner = Some(banner);

        doc.clear_children(banner);
        let icon = doc.create_element("i");
        doc.set_attr(icon, "class", "fas fa-exclamation-triangle");
        let text = doc.create_text(message);
        doc.append_child(banner, icon);
        doc.append_child(banner, text);
        banner
    }

    pub fn banner(&self) -> Option<NodeId> {
        self.banner
    }

    pub fn banner_message(&self, doc: &Document) -> Option<String> {
        self.banner.map(|banner| doc.text_content(banner))
    }
}
