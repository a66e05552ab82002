use crate::domain::model::Recommendation;
use crate::domain::ports::{ConfigProvider, RecommendationSource};
use crate::utils::error::{AssistError, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::{form_urlencoded, Url};

/// Query parameter carrying the free-text address.
pub const ADDRESS_PARAM: &str = "domicilio";

/// Calls the branch recommendation service over HTTP. No timeout and no retry:
/// the request either completes or fails with whatever the client reports.
#[derive(Debug, Clone)]
pub struct HttpRecommendationClient {
    client: Client,
    base_url: String,
    path: String,
}

impl HttpRecommendationClient {
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            path: path.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.api_base_url(), config.recommendation_path())
    }

    /// Full request URL with the address percent-encoded as `domicilio`.
    /// Spaces are sent as `%20`, never `+`.
    pub fn request_url(&self, address: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw).map_err(|e| AssistError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })?;
        // a literal '+' is serialized as %2B, so every '+' left is a space
        let encoded: String = form_urlencoded::byte_serialize(address.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        url.set_query(Some(&format!("{}={}", ADDRESS_PARAM, encoded)));
        Ok(url)
    }
}

#[async_trait]
impl RecommendationSource for HttpRecommendationClient {
    async fn recommend(&self, address: &str) -> Result<Recommendation> {
        let url = self.request_url(address)?;
        tracing::debug!("Requesting recommendation: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Recommendation response status: {}", status);

        if !status.is_success() {
            return Err(AssistError::StatusError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let recommendation: Recommendation = serde_json::from_str(&body)?;
        if let Some(zone) = &recommendation.zona_detectada {
            tracing::debug!("Detected zone: {}", zone);
        }
        if let Some(distances) = &recommendation.todas_distancias {
            tracing::debug!("Distances: {}", distances);
        }
        Ok(recommendation)
    }

    fn endpoint_hint(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_encodes_address() {
        let client = HttpRecommendationClient::new(
            "http://localhost:8000/",
            "/api/recomendacion/domicilio",
        );
        let url = client.request_url("Av. Coyoacán #12 & Sur+1").unwrap();
        assert_eq!(url.path(), "/api/recomendacion/domicilio");
        assert_eq!(
            url.query(),
            Some("domicilio=Av.%20Coyoac%C3%A1n%20%2312%20%26%20Sur%2B1")
        );
        let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            decoded,
            vec![("domicilio".to_string(), "Av. Coyoacán #12 & Sur+1".to_string())]
        );
    }

    #[test]
    fn test_bad_base_url_is_config_error() {
        let client = HttpRecommendationClient::new("not a url", "/x");
        assert!(matches!(
            client.request_url("Centro"),
            Err(AssistError::InvalidConfigValueError { .. })
        ));
    }
}
