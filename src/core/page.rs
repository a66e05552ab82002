//! Typed bindings to the elements the capture page must provide.

use crate::dom::{Document, NodeId};
use crate::utils::error::{AssistError, Result};

pub const FORM_ID: &str = "clienteForm";
pub const ADDRESS_ID: &str = "domicilio";
pub const BRANCH_SELECT_ID: &str = "sucursal";
pub const FORM_HEADER_CLASS: &str = "form-header";
pub const FORM_GROUP_CLASS: &str = "form-group";
pub const CLIENTS_TABLE_CLASS: &str = "clients-table";
pub const BUTTON_CLASS: &str = "btn";

pub const RECOMMEND_BUTTON_ID: &str = "btnRecomendar";
pub const RESULT_PANEL_ID: &str = "recomendacionResultado";
pub const RESULT_BRANCH_ID: &str = "sucursalRecomendada";
pub const RESULT_DISTANCE_ID: &str = "distanciaRecomendada";
pub const RESULT_REASON_ID: &str = "razonRecomendacion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBindings {
    pub form: Option<NodeId>,
    pub address: Option<NodeId>,
    pub branch_select: Option<NodeId>,
    pub form_header: Option<NodeId>,
}

impl PageBindings {
    /// Binds whatever is present. Features whose elements are missing stay off.
    pub fn bind(doc: &Document) -> Self {
        let bindings = Self {
            form: doc.element_by_id(FORM_ID),
            address: doc.element_by_id(ADDRESS_ID),
            branch_select: doc.element_by_id(BRANCH_SELECT_ID),
            form_header: doc.elements_by_class(FORM_HEADER_CLASS).first().copied(),
        };
        for selector in bindings.missing() {
            tracing::warn!("Page element {} not found; dependent features disabled", selector);
        }
        bindings
    }

    /// Like [`bind`](Self::bind) but every element is mandatory.
    pub fn bind_strict(doc: &Document) -> Result<Self> {
        let bindings = Self::bind(doc);
        match bindings.missing().first() {
            Some(selector) => Err(AssistError::MissingElement {
                selector: selector.clone(),
            }),
            None => Ok(bindings),
        }
    }

    pub fn missing(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.form.is_none() {
            missing.push(format!("#{}", FORM_ID));
        }
        if self.address.is_none() {
            missing.push(format!("#{}", ADDRESS_ID));
        }
        if self.branch_select.is_none() {
            missing.push(format!("#{}", BRANCH_SELECT_ID));
        }
        if self.form_header.is_none() {
            missing.push(format!(".{}", FORM_HEADER_CLASS));
        }
        missing
    }

    /// Address field and branch select, when both exist.
    pub fn recommendation_targets(&self) -> Option<(NodeId, NodeId)> {
        Some((self.address?, self.branch_select?))
    }
}
