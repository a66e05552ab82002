use crate::domain::model::Recommendation;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Anything that can suggest a branch for a free-text address.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(&self, address: &str) -> Result<Recommendation>;

    /// Where the service is expected to run, shown in failure hints.
    fn endpoint_hint(&self) -> &str;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn recommendation_path(&self) -> &str;
}
