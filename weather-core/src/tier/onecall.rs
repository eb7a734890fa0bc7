use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::TierError,
    http::HttpFetch,
    model::WeatherSnapshot,
    normalize::normalize,
    tier::{TierContext, TierId, WeatherTier},
};

/// Forecast blocks the one-call endpoint should leave out.
const EXCLUDE: &str = "minutely,hourly,daily,alerts";

/// Coordinate-based current conditions. Needs a geocoded city and an API key.
#[derive(Debug, Clone)]
pub struct OneCallTier {
    fetch: Arc<dyn HttpFetch>,
    endpoint: String,
    api_key: Option<String>,
}

impl OneCallTier {
    pub fn new(fetch: Arc<dyn HttpFetch>, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            fetch,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl WeatherTier for OneCallTier {
    fn id(&self) -> TierId {
        TierId::OneCall
    }

    async fn attempt(&self, ctx: &TierContext<'_>) -> Result<WeatherSnapshot, TierError> {
        let api_key = self.api_key.as_deref().ok_or(TierError::MissingApiKey)?;
        let coord = ctx.coordinate.ok_or(TierError::MissingCoordinates)?;

        let body = self
            .fetch
            .get_json(
                &self.endpoint,
                &[
                    ("lat", coord.latitude.to_string()),
                    ("lon", coord.longitude.to_string()),
                    ("exclude", EXCLUDE.to_string()),
                    ("appid", api_key.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        Ok(normalize(TierId::OneCall, &body)?)
    }
}
