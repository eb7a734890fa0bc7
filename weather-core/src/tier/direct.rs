use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::TierError,
    http::HttpFetch,
    model::WeatherSnapshot,
    normalize::normalize,
    tier::{TierContext, TierId, WeatherTier},
};

/// Name-based current weather, used when the coordinate tier is unusable.
#[derive(Debug, Clone)]
pub struct DirectTier {
    fetch: Arc<dyn HttpFetch>,
    endpoint: String,
    api_key: Option<String>,
}

impl DirectTier {
    pub fn new(fetch: Arc<dyn HttpFetch>, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            fetch,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl WeatherTier for DirectTier {
    fn id(&self) -> TierId {
        TierId::Direct
    }

    async fn attempt(&self, ctx: &TierContext<'_>) -> Result<WeatherSnapshot, TierError> {
        let api_key = self.api_key.as_deref().ok_or(TierError::MissingApiKey)?;

        let body = self
            .fetch
            .get_json(
                &self.endpoint,
                &[
                    ("q", ctx.request.query()),
                    ("appid", api_key.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        Ok(normalize(TierId::Direct, &body)?)
    }
}
