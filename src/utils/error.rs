use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Recommendation request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Recommendation API returned HTTP {status}")]
    StatusError { status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Page element not found: {selector}")]
    MissingElement { selector: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Page,
    System,
}

impl AssistError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AssistError::HttpError(_)
            | AssistError::StatusError { .. }
            | AssistError::SerializationError(_) => ErrorCategory::Network,
            AssistError::ConfigError { .. } | AssistError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            AssistError::MissingElement { .. } => ErrorCategory::Page,
            AssistError::IoError(_) => ErrorCategory::System,
        }
    }

    /// Short message suitable for end users, without transport internals.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => {
                "No se pudo obtener recomendación del servicio de sucursales".to_string()
            }
            ErrorCategory::Configuration => format!("Configuración inválida: {}", self),
            ErrorCategory::Page => format!("La página no tiene la estructura esperada: {}", self),
            ErrorCategory::System => format!("Error del sistema: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistError>;
