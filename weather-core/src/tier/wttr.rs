use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::TierError,
    http::{HttpFetch, join_segment},
    model::WeatherSnapshot,
    normalize::normalize,
    tier::{TierContext, TierId, WeatherTier},
};

/// wttr.in JSON format selector.
const FORMAT: &str = "j1";

/// Key-less last resort. Only the city name is sent; the country code is not
/// part of wttr.in's lookup.
#[derive(Debug, Clone)]
pub struct WttrTier {
    fetch: Arc<dyn HttpFetch>,
    endpoint: String,
}

impl WttrTier {
    pub fn new(fetch: Arc<dyn HttpFetch>, endpoint: String) -> Self {
        Self { fetch, endpoint }
    }
}

#[async_trait]
impl WeatherTier for WttrTier {
    fn id(&self) -> TierId {
        TierId::Wttr
    }

    async fn attempt(&self, ctx: &TierContext<'_>) -> Result<WeatherSnapshot, TierError> {
        let url = join_segment(&self.endpoint, &ctx.request.city)?;
        let body = self
            .fetch
            .get_json(&url, &[("format", FORMAT.to_string())])
            .await?;

        Ok(normalize(TierId::Wttr, &body)?)
    }
}
