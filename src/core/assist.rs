//! Page initialization and event dispatch.

use crate::config::AssistConfig;
use crate::core::enhancers::{self, Hover};
use crate::core::feedback::Feedback;
use crate::core::page::PageBindings;
use crate::core::recommendation::{
    PendingRecommendation, RecommendationOutcome, RecommendationWidget, StartResult,
};
use crate::core::validator::{FormValidator, SUBMIT_BLOCKED_MESSAGE};
use crate::dom::{Document, NodeId};
use crate::domain::ports::RecommendationSource;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Blur,
    Input,
    Submit,
    Click,
    MouseEnter,
    MouseLeave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    ValidateField,
    ValidateWhileTyping,
    ValidateBeforeSubmit,
    Recommend,
    Hover(Hover),
}

#[derive(Debug, Default, Clone)]
struct ListenerTable {
    entries: HashMap<(NodeId, Event), Vec<Handler>>,
}

impl ListenerTable {
    fn add(&mut self, node: NodeId, event: Event, handler: Handler) {
        self.entries.entry((node, event)).or_default().push(handler);
    }

    fn get(&self, node: NodeId, event: Event) -> Vec<Handler> {
        self.entries.get(&(node, event)).cloned().unwrap_or_default()
    }
}

/// What a dispatched event did.
#[derive(Debug, Default)]
pub struct Dispatch {
    pub handled: usize,
    pub default_prevented: bool,
    pub pending: Option<PendingRecommendation>,
}

/// How a recommendation click ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    NotStarted,
    Succeeded,
    Failed,
}

/// The capture page with its listeners attached.
#[derive(Debug)]
pub struct FormAssist {
    doc: Document,
    bindings: PageBindings,
    validator: Option<FormValidator>,
    widget: Option<RecommendationWidget>,
    feedback: Feedback,
    listeners: ListenerTable,
    animations: Option<NodeId>,
}

impl FormAssist {
    /// Runs once per page: builds the recommendation widget if needed,
    /// attaches every listener and injects the animation rules.
    pub fn init(mut doc: Document, config: &AssistConfig) -> Result<Self> {
        let bindings = if config.page.strict_bindings {
            PageBindings::bind_strict(&doc)?
        } else {
            PageBindings::bind(&doc)
        };
        let mut listeners = ListenerTable::default();
        let min_address_len = config.widget.min_address_len;

        let widget = match bindings.recommendation_targets() {
            Some((address, select)) => {
                if let Some(button) = RecommendationWidget::create(&mut doc, address) {
                    let hover = Handler::Hover(RecommendationWidget::hover());
                    listeners.add(button, Event::MouseEnter, hover);
                    listeners.add(button, Event::MouseLeave, hover);
                }
                RecommendationWidget::attach(&doc, address, select, min_address_len)
            }
            None => None,
        };
        if let Some(widget) = &widget {
            listeners.add(widget.button(), Event::Click, Handler::Recommend);
        }

        let validator = bindings
            .form
            .map(|form| FormValidator::new(form, min_address_len));
        if let Some(validator) = &validator {
            for control in validator.controls(&doc) {
                listeners.add(control, Event::Blur, Handler::ValidateField);
                if doc.has_attr(control, "required") {
                    listeners.add(control, Event::Input, Handler::ValidateWhileTyping);
                }
            }
            listeners.add(validator.form(), Event::Submit, Handler::ValidateBeforeSubmit);
        }

        for row in enhancers::table_rows(&doc) {
            listeners.add(row, Event::MouseEnter, Handler::Hover(Hover::TableRow));
            listeners.add(row, Event::MouseLeave, Handler::Hover(Hover::TableRow));
        }
        for button in enhancers::buttons(&doc) {
            listeners.add(button, Event::MouseEnter, Handler::Hover(Hover::Button));
            listeners.add(button, Event::MouseLeave, Handler::Hover(Hover::Button));
        }

        let animations = enhancers::inject_animations(&mut doc);
        tracing::debug!(
            "Page initialized: form={} widget={} listeners={}",
            validator.is_some(),
            widget.is_some(),
            listeners.entries.values().map(Vec::len).sum::<usize>()
        );

        Ok(Self {
            doc,
            bindings,
            validator,
            widget,
            feedback: Feedback::new(config.notifications.clone()),
            listeners,
            animations,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn bindings(&self) -> &PageBindings {
        &self.bindings
    }

    pub fn widget(&self) -> Option<&RecommendationWidget> {
        self.widget.as_ref()
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn animations(&self) -> Option<NodeId> {
        self.animations
    }

    pub fn listener_count(&self, node: NodeId, event: Event) -> usize {
        self.listeners.get(node, event).len()
    }

    /// Sets a control's value and fires `input` on it, like a keystroke.
    pub fn type_text(&mut self, field: NodeId, text: &str) -> Dispatch {
        self.doc.set_value(field, text);
        self.dispatch(field, Event::Input)
    }

    /// Fires `submit` on the form, if there is one.
    pub fn submit(&mut self) -> Dispatch {
        match self.bindings.form {
            Some(form) => self.dispatch(form, Event::Submit),
            None => Dispatch::default(),
        }
    }

    /// Runs the handlers attached to `target` for `event`, in attachment order.
    /// Clicks on disabled elements are dropped.
    pub fn dispatch(&mut self, target: NodeId, event: Event) -> Dispatch {
        let mut result = Dispatch::default();
        if event == Event::Click && self.doc.is_disabled(target) {
            return result;
        }
        let button = self.widget.as_ref().map(|w| w.button());

        for handler in self.listeners.get(target, event) {
            result.handled += 1;
            match handler {
                Handler::ValidateField => {
                    if let Some(validator) = &self.validator {
                        validator.validate_field(&mut self.doc, target, button);
                    }
                }
                Handler::ValidateWhileTyping => {
                    if let Some(validator) = &self.validator {
                        validator.validate_while_typing(&mut self.doc, target, button);
                    }
                }
                Handler::ValidateBeforeSubmit => {
                    let valid = self
                        .validator
                        .as_ref()
                        .map(|v| v.validate_form(&mut self.doc, button))
                        .unwrap_or(true);
                    if !valid {
                        result.default_prevented = true;
                        self.feedback.show_error(
                            &mut self.doc,
                            self.bindings.form_header,
                            SUBMIT_BLOCKED_MESSAGE,
                        );
                        tracing::debug!("Submission blocked by validation");
                    }
                }
                Handler::Recommend => {
                    if let Some(widget) = self.widget.as_mut() {
                        if let StartResult::Started(pending) =
                            widget.start(&mut self.doc, &mut self.feedback, self.bindings.form_header)
                        {
                            result.pending = Some(pending);
                        }
                    }
                }
                Handler::Hover(hover) => {
                    hover.apply(&mut self.doc, target, event == Event::MouseEnter);
                }
            }
        }
        result
    }

    /// Renders a finished request. The button is restored on every path.
    pub fn complete_recommendation(&mut self, outcome: RecommendationOutcome) {
        self.complete_recommendation_at(outcome, Instant::now());
    }

    /// Same as [`complete_recommendation`](Self::complete_recommendation) with
    /// an explicit clock. Expired notifications are dropped before a new one
    /// is shown.
    pub fn complete_recommendation_at(&mut self, outcome: RecommendationOutcome, now: Instant) {
        self.feedback.sweep(&mut self.doc, now);
        if let Some(widget) = self.widget.as_mut() {
            widget.complete(&mut self.doc, &mut self.feedback, outcome, now);
        }
    }

    /// Click, request and render in one call.
    pub async fn click_recommend<S>(&mut self, source: &S) -> ClickResult
    where
        S: RecommendationSource + ?Sized,
    {
        let Some(button) = self.widget.as_ref().map(|w| w.button()) else {
            return ClickResult::NotStarted;
        };
        let Some(pending) = self.dispatch(button, Event::Click).pending else {
            return ClickResult::NotStarted;
        };
        let outcome = pending.resolve(source).await;
        let result = match outcome {
            RecommendationOutcome::Success(_) => ClickResult::Succeeded,
            RecommendationOutcome::Failure { .. } => ClickResult::Failed,
        };
        self.complete_recommendation(outcome);
        result
    }

    /// Expires notifications whose time is up.
    pub fn sweep_notifications(&mut self, now: Instant) -> usize {
        self.feedback.sweep(&mut self.doc, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::page::RECOMMEND_BUTTON_ID;

    const PAGE: &str = r#"<html><head></head><body>
        <div class="form-header"><h1>Captura</h1></div>
        <form id="clienteForm">
          <div class="form-group"><input type="text" id="nombre" minlength="2" required></div>
          <div class="form-group"><input type="email" id="email" required></div>
          <div class="form-group"><textarea id="domicilio" required></textarea></div>
          <div class="form-group">
            <select id="sucursal"><option value="Centro">Centro</option></select>
          </div>
          <button type="submit" class="btn">Guardar</button>
        </form>
        <table class="clients-table"><tbody><tr><td>Ana</td></tr></tbody></table>
    </body></html>"#;

    fn assist() -> FormAssist {
        FormAssist::init(Document::from_html(PAGE), &AssistConfig::default()).unwrap()
    }

    #[test]
    fn test_init_wires_listeners() {
        let assist = assist();
        let doc = assist.document();
        let email = doc.element_by_id("email").unwrap();
        let select = doc.element_by_id("sucursal").unwrap();
        let button = doc.element_by_id(RECOMMEND_BUTTON_ID).unwrap();

        assert_eq!(assist.listener_count(email, Event::Blur), 1);
        assert_eq!(assist.listener_count(email, Event::Input), 1);
        assert_eq!(assist.listener_count(select, Event::Input), 0);
        assert_eq!(assist.listener_count(button, Event::Click), 1);
        // own hover plus the generic .btn hover
        assert_eq!(assist.listener_count(button, Event::MouseEnter), 2);
        assert!(assist.animations().is_some());
    }

    #[test]
    fn test_submit_blocked_shows_banner_once() {
        let mut assist = assist();
        assert!(assist.submit().default_prevented);
        assert!(assist.submit().default_prevented);
        let doc = assist.document();
        assert_eq!(doc.elements_by_class("error-global").len(), 1);
        assert_eq!(
            assist.feedback().banner_message(doc).as_deref(),
            Some(SUBMIT_BLOCKED_MESSAGE)
        );
    }

    #[test]
    fn test_submit_allowed_when_complete() {
        let mut assist = assist();
        let doc = assist.document();
        let nombre = doc.element_by_id("nombre").unwrap();
        let email = doc.element_by_id("email").unwrap();
        let address = doc.element_by_id("domicilio").unwrap();

        assist.type_text(nombre, "Ana");
        assist.type_text(email, "ana@correo.mx");
        assist.type_text(address, "Calle 5 de Mayo 10");
        assert!(!assist.submit().default_prevented);
        assert!(assist.feedback().banner().is_none());
    }

    #[test]
    fn test_click_on_disabled_button_is_dropped() {
        let mut assist = assist();
        let doc = assist.document();
        let address = doc.element_by_id("domicilio").unwrap();
        let button = doc.element_by_id(RECOMMEND_BUTTON_ID).unwrap();
        assist.type_text(address, "Calle 5 de Mayo 10");

        let first = assist.dispatch(button, Event::Click);
        assert!(first.pending.is_some());
        let second = assist.dispatch(button, Event::Click);
        assert_eq!(second.handled, 0);
        assert!(second.pending.is_none());

        // other events still run while the request is pending
        let email = assist.document().element_by_id("email").unwrap();
        assert_eq!(assist.dispatch(email, Event::Blur).handled, 1);
    }

    #[test]
    fn test_row_hover() {
        let mut assist = assist();
        let row = enhancers::table_rows(assist.document())[0];
        assist.dispatch(row, Event::MouseEnter);
        assert_eq!(
            assist.document().style(row, "transform"),
            Some("translateX(5px)")
        );
        assist.dispatch(row, Event::MouseLeave);
        assert_eq!(assist.document().style(row, "transform"), Some("translateX(0)"));
    }

    #[test]
    fn test_strict_bindings_fail_fast() {
        let mut config = AssistConfig::default();
        config.page.strict_bindings = true;
        let result = FormAssist::init(Document::from_html("<form id=\"clienteForm\"></form>"), &config);
        assert!(result.is_err());
    }
}
