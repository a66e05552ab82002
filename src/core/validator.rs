use crate::core::page::{ADDRESS_ID, FORM_GROUP_CLASS};
use crate::dom::{Document, NodeId};
use crate::domain::model::{FieldKind, FieldOutcome};
use regex::Regex;
use std::sync::OnceLock;

pub const REQUIRED_MESSAGE: &str = "Este campo es obligatorio";
pub const EMAIL_MESSAGE: &str = "Ingrese un correo electrónico válido";
pub const SUBMIT_BLOCKED_MESSAGE: &str =
    "Por favor, complete todos los campos obligatorios correctamente.";

const ERROR_CLASS: &str = "error-message";
const INVALID_BORDER: &str = "#e74c3c";
const VALID_BORDER: &str = "#2ecc71";
const NEUTRAL_BORDER: &str = "#ddd";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

pub fn field_kind(doc: &Document, field: NodeId) -> FieldKind {
    match doc.tag_name(field) {
        Some("textarea") => FieldKind::TextArea,
        Some("select") => FieldKind::Select,
        Some("input") => match doc.attr(field, "type").map(str::to_ascii_lowercase) {
            None => FieldKind::Text,
            Some(t) if t == "text" => FieldKind::Text,
            Some(t) if t == "email" => FieldKind::Email,
            Some(_) => FieldKind::Other,
        },
        _ => FieldKind::Other,
    }
}

/// Applies the rules to the live value without touching the page.
pub fn evaluate(doc: &Document, field: NodeId) -> FieldOutcome {
    let value = doc.value(field);
    let value = value.trim();
    let required = doc.has_attr(field, "required");

    if value.is_empty() {
        return if required {
            FieldOutcome::Invalid(REQUIRED_MESSAGE.to_string())
        } else {
            FieldOutcome::Neutral
        };
    }

    match field_kind(doc, field) {
        FieldKind::Email if !is_valid_email(value) => {
            FieldOutcome::Invalid(EMAIL_MESSAGE.to_string())
        }
        FieldKind::Text => match min_length(doc, field) {
            Some(min) if value.chars().count() < min => {
                FieldOutcome::Invalid(format!("Mínimo {} caracteres", min))
            }
            _ => FieldOutcome::Valid,
        },
        _ => FieldOutcome::Valid,
    }
}

fn min_length(doc: &Document, field: NodeId) -> Option<usize> {
    doc.attr(field, "minlength")?.trim().parse().ok()
}

/// Validation listeners for one form.
#[derive(Debug, Clone)]
pub struct FormValidator {
    form: NodeId,
    min_address_len: usize,
}

impl FormValidator {
    pub fn new(form: NodeId, min_address_len: usize) -> Self {
        Self {
            form,
            min_address_len,
        }
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn controls(&self, doc: &Document) -> Vec<NodeId> {
        doc.descendants(self.form)
            .into_iter()
            .filter(|n| doc.is_control(*n))
            .collect()
    }

    pub fn required_fields(&self, doc: &Document) -> Vec<NodeId> {
        doc.descendants(self.form)
            .into_iter()
            .filter(|n| doc.has_attr(*n, "required"))
            .collect()
    }

    /// Blur handler: revalidates the field and restyles its form group.
    pub fn validate_field(
        &self,
        doc: &mut Document,
        field: NodeId,
        recommend_button: Option<NodeId>,
    ) -> FieldOutcome {
        let group = doc.closest_with_class(field, FORM_GROUP_CLASS);
        if let Some(group) = group {
            clear_errors(doc, group);
        }

        let outcome = evaluate(doc, field);
        if outcome.passes() {
            self.enable_recommendation(doc, field, recommend_button);
        }

        match group {
            Some(group) => match &outcome {
                FieldOutcome::Invalid(message) => show_error(doc, group, message),
                FieldOutcome::Valid => mark_valid(doc, group),
                FieldOutcome::Neutral => reset_state(doc, group),
            },
            None => tracing::debug!("Field {:?} has no form group; styling skipped", field),
        }
        outcome
    }

    /// Input handler for required fields: an emptied field goes back to neutral.
    pub fn validate_while_typing(
        &self,
        doc: &mut Document,
        field: NodeId,
        recommend_button: Option<NodeId>,
    ) -> FieldOutcome {
        if doc.value(field).trim().is_empty() {
            if let Some(group) = doc.closest_with_class(field, FORM_GROUP_CLASS) {
                reset_state(doc, group);
            }
            return FieldOutcome::Neutral;
        }
        self.validate_field(doc, field, recommend_button)
    }

    /// Submit handler: validates every required field, without stopping at the
    /// first failure, and reports whether submission may proceed.
    pub fn validate_form(&self, doc: &mut Document, recommend_button: Option<NodeId>) -> bool {
        let mut valid = true;
        for field in self.required_fields(doc) {
            if !self.validate_field(doc, field, recommend_button).passes() {
                valid = false;
            }
        }
        valid
    }

    fn enable_recommendation(&self, doc: &mut Document, field: NodeId, button: Option<NodeId>) {
        let Some(button) = button else {
            return;
        };
        if field_kind(doc, field) != FieldKind::TextArea || doc.id(field) != Some(ADDRESS_ID) {
            return;
        }
        if doc.value(field).trim().chars().count() >= self.min_address_len {
            doc.set_disabled(button, false);
        }
    }
}

fn clear_errors(doc: &mut Document, group: NodeId) {
    for error in doc.descendants_by_class(group, ERROR_CLASS) {
        doc.remove(error);
    }
}

fn set_border(doc: &mut Document, group: NodeId, color: &str) {
    if let Some(control) = doc.first_control(group) {
        doc.set_style(control, "border-color", color);
    }
}

fn show_error(doc: &mut Document, group: NodeId, message: &str) {
    clear_errors(doc, group);

    let error = doc.create_element("div");
    doc.set_attr(error, "class", ERROR_CLASS);
    let icon = doc.create_element("i");
    doc.set_attr(icon, "class", "fas fa-exclamation-circle");
    let text = doc.create_text(message);
    doc.append_child(error, icon);
    doc.append_child(error, text);
    for (property, value) in [
        ("color", INVALID_BORDER),
        ("font-size", "14px"),
        ("margin-top", "5px"),
        ("display", "flex"),
        ("align-items", "center"),
        ("gap", "8px"),
    ] {
        doc.set_style(error, property, value);
    }
    doc.append_child(group, error);

    set_border(doc, group, INVALID_BORDER);
}

fn reset_state(doc: &mut Document, group: NodeId) {
    set_border(doc, group, NEUTRAL_BORDER);
    clear_errors(doc, group);
}

fn mark_valid(doc: &mut Document, group: NodeId) {
    set_border(doc, group, VALID_BORDER);
}

/// Error text currently shown in the field's form group.
pub fn error_message(doc: &Document, field: NodeId) -> Option<String> {
    let group = doc.closest_with_class(field, FORM_GROUP_CLASS)?;
    doc.descendants_by_class(group, ERROR_CLASS)
        .first()
        .map(|e| doc.text_content(*e))
}
