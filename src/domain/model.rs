use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How a control is validated, derived from its tag and `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Text,
    TextArea,
    Select,
    Other,
}

/// Result of one validation pass over a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Valid,
    Invalid(String),
    Neutral,
}

impl FieldOutcome {
    /// Neutral fields do not block submission.
    pub fn passes(&self) -> bool {
        !matches!(self, FieldOutcome::Invalid(_))
    }
}

/// `distancia_km` arrives either as a number or as preformatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Km(f64),
    Text(String),
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Km(km) => write!(f, "{} km", km),
            Distance::Text(text) => f.write_str(text),
        }
    }
}

/// Body of a successful recommendation response. Only the first three fields
/// are rendered; the rest are logged as received, whatever their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub sucursal_recomendada: String,
    pub distancia_km: Distance,
    pub razon: String,
    #[serde(default)]
    pub zona_detectada: Option<Value>,
    #[serde(default)]
    pub todas_distancias: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_display() {
        assert_eq!(Distance::Km(3.2).to_string(), "3.2 km");
        assert_eq!(Distance::Km(5.0).to_string(), "5 km");
        assert_eq!(Distance::Text("n/d".into()).to_string(), "n/d");
    }

    #[test]
    fn test_recommendation_accepts_text_distance_and_extra_fields() {
        let body = r#"{
            "sucursal_recomendada": "KTM Ferbel Coapa",
            "distancia_km": "desconocida",
            "razon": "Zona no identificada",
            "zona_detectada": null,
            "todas_distancias": {"KTM Ferbel Coapa": 4.5}
        }"#;
        let rec: Recommendation = serde_json::from_str(body).unwrap();
        assert_eq!(rec.distancia_km, Distance::Text("desconocida".into()));
        let distances = rec.todas_distancias.unwrap();
        assert_eq!(distances["KTM Ferbel Coapa"], 4.5);
    }

    #[test]
    fn test_recommendation_minimal_body() {
        let body = r#"{"sucursal_recomendada": "Centro", "distancia_km": 3.2, "razon": "closest"}"#;
        let rec: Recommendation = serde_json::from_str(body).unwrap();
        assert_eq!(rec.distancia_km, Distance::Km(3.2));
        assert!(rec.zona_detectada.is_none());
        assert!(rec.todas_distancias.is_none());
    }

    #[test]
    fn test_recommendation_ignores_odd_optional_fields() {
        let body = r#"{
            "sucursal_recomendada": "Centro",
            "distancia_km": 3.2,
            "razon": "x",
            "zona_detectada": 7,
            "todas_distancias": null
        }"#;
        let rec: Recommendation = serde_json::from_str(body).unwrap();
        assert_eq!(rec.sucursal_recomendada, "Centro");
        assert!(rec.todas_distancias.is_none());

        let body = r#"{"sucursal_recomendada": "Centro", "distancia_km": 3.2, "razon": "x",
            "todas_distancias": {"Centro": "n/d"}}"#;
        let rec: Recommendation = serde_json::from_str(body).unwrap();
        assert_eq!(rec.todas_distancias.unwrap()["Centro"], "n/d");
    }

    #[test]
    fn test_outcome_passes() {
        assert!(FieldOutcome::Valid.passes());
        assert!(FieldOutcome::Neutral.passes());
        assert!(!FieldOutcome::Invalid("x".into()).passes());
    }
}
