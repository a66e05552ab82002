//! Nearest-branch recommendation widget.
//!
//! The button moves between `Idle` and `Loading`. A click with a long enough
//! address yields a [`PendingRecommendation`]; resolving it is the only await
//! point, so the page stays usable while the request runs. Completing it
//! always restores the button before rendering the outcome.

use crate::core::enhancers::Hover;
use crate::core::feedback::Feedback;
use crate::core::page::{
    FORM_GROUP_CLASS, RECOMMEND_BUTTON_ID, RESULT_BRANCH_ID, RESULT_DISTANCE_ID, RESULT_PANEL_ID,
    RESULT_REASON_ID,
};
use crate::dom::{Document, NodeId};
use crate::domain::model::{NotificationKind, Recommendation};
use crate::domain::ports::RecommendationSource;
use std::time::Instant;

pub const IDLE_LABEL: &str = "Recomendar Sucursal Más Cercana";
pub const LOADING_LABEL: &str = "Calculando...";
pub const ERROR_PANEL_CLASS: &str = "recomendacion-error";
const CONTAINER_CLASS: &str = "recomendacion-container";
const IDLE_ICON: &str = "fas fa-map-marker-alt";
const LOADING_ICON: &str = "fas fa-spinner fa-spin";
const MATCH_BORDER: &str = "#28a745";

pub fn short_address_message(min_len: usize) -> String {
    format!(
        "Por favor, ingrese un domicilio válido (mínimo {} caracteres) para recomendar sucursal.",
        min_len
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Loading,
}

/// Outcome of a single request, rendered by [`RecommendationWidget::complete`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    Success(Recommendation),
    Failure { error: String, hint: String },
}

/// Address captured when the request was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecommendation {
    address: String,
}

impl PendingRecommendation {
    pub async fn resolve<S>(self, source: &S) -> RecommendationOutcome
    where
        S: RecommendationSource + ?Sized,
    {
        match source.recommend(&self.address).await {
            Ok(recommendation) => {
                tracing::info!(
                    "Recommended branch '{}' ({})",
                    recommendation.sucursal_recomendada,
                    recommendation.distancia_km
                );
                RecommendationOutcome::Success(recommendation)
            }
            Err(e) => {
                tracing::warn!("Recommendation request failed: {}", e);
                RecommendationOutcome::Failure {
                    error: e.to_string(),
                    hint: source.endpoint_hint().to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartResult {
    Started(PendingRecommendation),
    AddressTooShort,
    Busy,
}

#[derive(Debug, Clone)]
pub struct RecommendationWidget {
    address: NodeId,
    branch_select: NodeId,
    button: NodeId,
    panel: Option<NodeId>,
    state: ButtonState,
    min_address_len: usize,
}

impl RecommendationWidget {
    /// Builds the button and hidden result panel inside the address field's
    /// form group. Does nothing when the button already exists or the address
    /// field has no form group. Returns the created button.
    pub fn create(doc: &mut Document, address: NodeId) -> Option<NodeId> {
        if doc.element_by_id(RECOMMEND_BUTTON_ID).is_some() {
            tracing::debug!("#{} already present; widget not recreated", RECOMMEND_BUTTON_ID);
            return None;
        }
        let Some(group) = doc.closest_with_class(address, FORM_GROUP_CLASS) else {
            tracing::warn!("Address field has no form group; recommendation widget skipped");
            return None;
        };

        let container = doc.create_element("div");
        doc.set_attr(container, "class", CONTAINER_CLASS);
        for (property, value) in [
            ("margin-top", "15px"),
            ("padding", "15px"),
            ("background-color", "#f8f9fa"),
            ("border-radius", "8px"),
            ("border", "1px solid #dee2e6"),
        ] {
            doc.set_style(container, property, value);
        }

        let button = doc.create_element("button");
        doc.set_attr(button, "type", "button");
        doc.set_attr(button, "id", RECOMMEND_BUTTON_ID);
        doc.set_attr(button, "class", "btn btn-info");
        set_button_content(doc, button, IDLE_ICON, IDLE_LABEL);
        for (property, value) in [
            ("display", "flex"),
            ("align-items", "center"),
            ("gap", "8px"),
            ("padding", "10px 15px"),
            ("border-radius", "6px"),
            ("border", "none"),
            ("background-color", "#17a2b8"),
            ("color", "white"),
            ("cursor", "pointer"),
            ("font-size", "14px"),
            ("transition", "all 0.3s ease"),
        ] {
            doc.set_style(button, property, value);
        }

        let panel = doc.create_element("div");
        doc.set_attr(panel, "id", RESULT_PANEL_ID);
        for (property, value) in [
            ("display", "none"),
            ("margin-top", "15px"),
            ("padding", "15px"),
            ("background-color", "#e7f3ff"),
            ("border-radius", "5px"),
            ("border-left", "4px solid #007bff"),
        ] {
            doc.set_style(panel, property, value);
        }
        build_result_fields(doc, panel);

        doc.append_child(container, button);
        doc.append_child(container, panel);
        doc.append_child(group, container);
        Some(button)
    }

    /// Hover style of a button built by [`create`](Self::create).
    pub fn hover() -> Hover {
        Hover::RecommendButton
    }

    /// Wires the widget to an existing `#btnRecomendar`.
    pub fn attach(
        doc: &Document,
        address: NodeId,
        branch_select: NodeId,
        min_address_len: usize,
    ) -> Option<Self> {
        let button = doc.element_by_id(RECOMMEND_BUTTON_ID)?;
        Some(Self {
            address,
            branch_select,
            button,
            panel: doc.element_by_id(RESULT_PANEL_ID),
            state: ButtonState::Idle,
            min_address_len,
        })
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn panel(&self) -> Option<NodeId> {
        self.panel
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Click handler up to the network call.
    pub fn start(
        &mut self,
        doc: &mut Document,
        feedback: &mut Feedback,
        header: Option<NodeId>,
    ) -> StartResult {
        if self.state == ButtonState::Loading {
            return StartResult::Busy;
        }
        let address = doc.value(self.address).trim().to_string();
        if address.chars().count() < self.min_address_len {
            feedback.show_error(doc, header, &short_address_message(self.min_address_len));
            return StartResult::AddressTooShort;
        }

        set_button_content(doc, self.button, LOADING_ICON, LOADING_LABEL);
        doc.set_disabled(self.button, true);
        self.state = ButtonState::Loading;
        tracing::debug!("Recommendation requested for '{}'", address);
        StartResult::Started(PendingRecommendation { address })
    }

    /// Restores the button, then renders the outcome.
    pub fn complete(
        &mut self,
        doc: &mut Document,
        feedback: &mut Feedback,
        outcome: RecommendationOutcome,
        now: Instant,
    ) {
        set_button_content(doc, self.button, IDLE_ICON, IDLE_LABEL);
        doc.set_disabled(self.button, false);
        self.state = ButtonState::Idle;

        let Some(panel) = self.panel else {
            tracing::warn!("#{} missing; recommendation not rendered", RESULT_PANEL_ID);
            return;
        };

        match outcome {
            RecommendationOutcome::Success(recommendation) => {
                doc.clear_children(panel);
                build_result_fields(doc, panel);
                set_field_text(doc, RESULT_BRANCH_ID, &recommendation.sucursal_recomendada);
                set_field_text(doc, RESULT_DISTANCE_ID, &recommendation.distancia_km.to_string());
                set_field_text(doc, RESULT_REASON_ID, &recommendation.razon);
                doc.set_style(panel, "display", "block");

                let branch = &recommendation.sucursal_recomendada;
                if select_branch(doc, self.branch_select, branch) {
                    doc.set_style(self.branch_select, "border-color", MATCH_BORDER);
                    feedback.notify(
                        doc,
                        &format!("Sucursal \"{}\" seleccionada automáticamente", branch),
                        NotificationKind::Success,
                        now,
                    );
                } else {
                    tracing::debug!("No branch option matches '{}'", branch);
                }
                doc.set_style(panel, "animation", "fadeIn 0.5s ease");
            }
            RecommendationOutcome::Failure { error, hint } => {
                tracing::debug!("Rendering recommendation failure: {}", error);
                render_failure(doc, panel, &hint);
                doc.set_style(panel, "display", "block");
            }
        }
    }
}

/// Selects the first option whose value equals `branch` exactly.
pub fn select_branch(doc: &mut Document, select: NodeId, branch: &str) -> bool {
    let position = doc
        .options(select)
        .iter()
        .position(|option| doc.option_value(*option) == branch);
    match position {
        Some(index) => {
            doc.select_index(select, index);
            true
        }
        None => false,
    }
}

/// Current visible label of the button.
pub fn button_label(doc: &Document, button: NodeId) -> String {
    doc.text_content(button).trim().to_string()
}

fn set_button_content(doc: &mut Document, button: NodeId, icon_class: &str, label: &str) {
    doc.clear_children(button);
    let icon = doc.create_element("i");
    doc.set_attr(icon, "class", icon_class);
    let text = doc.create_text(label);
    doc.append_child(button, icon);
    doc.append_child(button, text);
}

fn set_field_text(doc: &mut Document, id: &str, text: &str) {
    if let Some(field) = doc.element_by_id(id) {
        doc.set_text(field, text);
    }
}

fn build_result_fields(doc: &mut Document, panel: NodeId) {
    let header = doc.create_element("div");
    for (property, value) in [
        ("display", "flex"),
        ("align-items", "center"),
        ("gap", "10px"),
        ("margin-bottom", "10px"),
    ] {
        doc.set_style(header, property, value);
    }
    let bulb = doc.create_element("i");
    doc.set_attr(bulb, "class", "fas fa-lightbulb");
    let title = doc.create_element("h4");
    doc.set_text(title, "Sugerencia de Sucursal");
    doc.append_child(header, bulb);
    doc.append_child(header, title);
    doc.append_child(panel, header);

    for (label, icon, id) in [
        ("Sucursal recomendada:", "fas fa-store", RESULT_BRANCH_ID),
        ("Distancia aproximada:", "fas fa-map", RESULT_DISTANCE_ID),
        ("Razón:", "fas fa-info-circle", RESULT_REASON_ID),
    ] {
        let row = doc.create_element("div");
        let strong = doc.create_element("strong");
        let icon_node = doc.create_element("i");
        doc.set_attr(icon_node, "class", icon);
        let label_node = doc.create_text(label);
        doc.append_child(strong, icon_node);
        doc.append_child(strong, label_node);
        let span = doc.create_element("span");
        doc.set_attr(span, "id", id);
        doc.append_child(row, strong);
        doc.append_child(row, span);
        doc.append_child(panel, row);
    }
}

fn render_failure(doc: &mut Document, panel: NodeId, hint: &str) {
    doc.clear_children(panel);
    let error = doc.create_element("div");
    doc.set_attr(error, "class", ERROR_PANEL_CLASS);
    for (property, value) in [
        ("color", "#721c24"),
        ("background-color", "#f8d7da"),
        ("padding", "10px"),
        ("border-radius", "4px"),
    ] {
        doc.set_style(error, property, value);
    }

    let icon = doc.create_element("i");
    doc.set_attr(icon, "class", "fas fa-exclamation-triangle");
    let strong = doc.create_element("strong");
    doc.set_text(strong, "Error:");
    let message = doc.create_text(" No se pudo obtener recomendación. ");
    let br = doc.create_element("br");
    let small = doc.create_element("small");
    doc.set_text(
        small,
        &format!("Asegúrate de que la API esté corriendo en {}", hint),
    );
    for child in [icon, strong, message, br, small] {
        doc.append_child(error, child);
    }
    doc.append_child(panel, error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::NotificationConfig;
    use crate::domain::model::Distance;

    const PAGE: &str = r#"
        <form id="clienteForm">
          <div class="form-group"><textarea id="domicilio">Av. Universidad 1000</textarea></div>
          <select id="sucursal">
            <option value="">Seleccione</option>
            <option value="Norte">Norte</option>
            <option value="Centro">Centro</option>
          </select>
        </form>"#;

    fn widget(doc: &mut Document) -> RecommendationWidget {
        let address = doc.element_by_id("domicilio").unwrap();
        let select = doc.element_by_id("sucursal").unwrap();
        RecommendationWidget::create(doc, address).unwrap();
        RecommendationWidget::attach(doc, address, select, 5).unwrap()
    }

    fn centro() -> Recommendation {
        Recommendation {
            sucursal_recomendada: "Centro".into(),
            distancia_km: Distance::Km(3.2),
            razon: "closest".into(),
            zona_detectada: None,
            todas_distancias: None,
        }
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut doc = Document::from_html(PAGE);
        let address = doc.element_by_id("domicilio").unwrap();
        let button = RecommendationWidget::create(&mut doc, address).unwrap();
        assert!(RecommendationWidget::create(&mut doc, address).is_none());
        assert_eq!(doc.elements_by_class(CONTAINER_CLASS).len(), 1);
        assert_eq!(button_label(&doc, button), IDLE_LABEL);

        let panel = doc.element_by_id(RESULT_PANEL_ID).unwrap();
        assert!(!doc.is_visible(panel));
        assert!(doc.element_by_id(RESULT_DISTANCE_ID).is_some());
    }

    #[test]
    fn test_create_needs_form_group() {
        let mut doc = Document::from_html(r#"<textarea id="domicilio"></textarea>"#);
        let address = doc.element_by_id("domicilio").unwrap();
        assert!(RecommendationWidget::create(&mut doc, address).is_none());
        assert!(doc.element_by_id(RECOMMEND_BUTTON_ID).is_none());
    }

    #[test]
    fn test_start_sets_loading_and_blocks_reentry() {
        let mut doc = Document::from_html(PAGE);
        let mut feedback = Feedback::new(NotificationConfig::default());
        let mut widget = widget(&mut doc);

        let first = widget.start(&mut doc, &mut feedback, None);
        assert_eq!(
            first,
            StartResult::Started(PendingRecommendation {
                address: "Av. Universidad 1000".into()
            })
        );
        assert!(doc.is_disabled(widget.button()));
        assert_eq!(button_label(&doc, widget.button()), LOADING_LABEL);
        assert_eq!(widget.start(&mut doc, &mut feedback, None), StartResult::Busy);
    }

    #[test]
    fn test_short_address_shows_banner() {
        let mut doc = Document::from_html(PAGE);
        let mut feedback = Feedback::new(NotificationConfig::default());
        let mut widget = widget(&mut doc);
        let address = doc.element_by_id("domicilio").unwrap();
        doc.set_value(address, " Sur  ");

        assert_eq!(
            widget.start(&mut doc, &mut feedback, None),
            StartResult::AddressTooShort
        );
        assert_eq!(
            feedback.banner_message(&doc),
            Some(short_address_message(5))
        );
        assert_eq!(widget.state(), ButtonState::Idle);
        assert!(!doc.is_disabled(widget.button()));
    }

    #[test]
    fn test_complete_success_selects_branch() {
        let mut doc = Document::from_html(PAGE);
        let mut feedback = Feedback::new(NotificationConfig::default());
        let mut widget = widget(&mut doc);
        widget.start(&mut doc, &mut feedback, None);

        widget.complete(
            &mut doc,
            &mut feedback,
            RecommendationOutcome::Success(centro()),
            Instant::now(),
        );

        let panel = widget.panel().unwrap();
        assert!(doc.is_visible(panel));
        let distance = doc.element_by_id(RESULT_DISTANCE_ID).unwrap();
        assert_eq!(doc.text_content(distance), "3.2 km");
        let select = doc.element_by_id("sucursal").unwrap();
        assert_eq!(doc.value(select), "Centro");
        assert_eq!(doc.style(select, "border-color"), Some(MATCH_BORDER));
        assert_eq!(feedback.active().count(), 1);
        assert_eq!(button_label(&doc, widget.button()), IDLE_LABEL);
        assert!(!doc.is_disabled(widget.button()));
    }

    #[test]
    fn test_unmatched_branch_keeps_selection() {
        let mut doc = Document::from_html(PAGE);
        let mut feedback = Feedback::new(NotificationConfig::default());
        let mut widget = widget(&mut doc);
        let select = doc.element_by_id("sucursal").unwrap();
        doc.set_value(select, "Norte");

        let mut rec = centro();
        rec.sucursal_recomendada = "centro".into();
        widget.start(&mut doc, &mut feedback, None);
        widget.complete(&mut doc, &mut feedback, RecommendationOutcome::Success(rec), Instant::now());

        assert_eq!(doc.value(select), "Norte");
        assert_eq!(feedback.active().count(), 0);
    }

    #[test]
    fn test_failure_then_success_rebuilds_fields() {
        let mut doc = Document::from_html(PAGE);
        let mut feedback = Feedback::new(NotificationConfig::default());
        let mut widget = widget(&mut doc);
        let panel = widget.panel().unwrap();

        widget.start(&mut doc, &mut feedback, None);
        widget.complete(
            &mut doc,
            &mut feedback,
            RecommendationOutcome::Failure {
                error: "HTTP 500".into(),
                hint: "http://localhost:8000".into(),
            },
            Instant::now(),
        );
        assert!(doc.is_visible(panel));
        assert_eq!(doc.descendants_by_class(panel, ERROR_PANEL_CLASS).len(), 1);
        assert!(doc
            .text_content(panel)
            .contains("Asegúrate de que la API esté corriendo en http://localhost:8000"));
        assert!(doc.element_by_id(RESULT_BRANCH_ID).is_none());
        assert_eq!(widget.state(), ButtonState::Idle);

        widget.start(&mut doc, &mut feedback, None);
        widget.complete(
            &mut doc,
            &mut feedback,
            RecommendationOutcome::Success(centro()),
            Instant::now(),
        );
        assert!(doc.descendants_by_class(panel, ERROR_PANEL_CLASS).is_empty());
        let branch = doc.element_by_id(RESULT_BRANCH_ID).unwrap();
        assert_eq!(doc.text_content(branch), "Centro");
    }

    #[test]
    fn test_select_branch_exact_match_only() {
        let mut doc = Document::from_html(PAGE);
        let select = doc.element_by_id("sucursal").unwrap();
        assert!(!select_branch(&mut doc, select, " Centro"));
        assert!(select_branch(&mut doc, select, "Centro"));
        assert_eq!(doc.selected_index(select), Some(2));
    }
}
