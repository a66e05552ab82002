use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AssistError, Result};
use crate::utils::validation::{
    validate_endpoint_path, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_RECOMMENDATION_PATH: &str = "/api/recomendacion/domicilio";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub page: PageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub recommendation_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            recommendation_path: DEFAULT_RECOMMENDATION_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub min_address_len: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self { min_address_len: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub visible_ms: u64,
    pub exit_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            visible_ms: 5000,
            exit_ms: 300,
        }
    }
}

impl NotificationConfig {
    pub fn visible(&self) -> Duration {
        Duration::from_millis(self.visible_ms)
    }

    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Fail at startup when an expected element is missing instead of
    /// disabling the feature that needs it.
    pub strict_bindings: bool,
}

impl AssistConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssistError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AssistError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AssistError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Base URL followed by the recommendation path, without a doubled slash.
    pub fn recommendation_url(&self) -> String {
        format!(
            "{}{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.recommendation_path
        )
    }
}

impl Validate for AssistConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_endpoint_path("api.recommendation_path", &self.api.recommendation_path)?;
        validate_positive_number("widget.min_address_len", self.widget.min_address_len, 1)?;
        validate_positive_number(
            "notifications.visible_ms",
            self.notifications.visible_ms as usize,
            1,
        )?;
        Ok(())
    }
}

impl ConfigProvider for AssistConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn recommendation_path(&self) -> &str {
        &self.api.recommendation_path
    }
}
