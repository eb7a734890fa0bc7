//! Ordered fallback over the weather tiers.
//!
//! Geocoding runs first; its result only decides whether the coordinate tier
//! has anything to work with. Tiers then run one at a time in chain order and
//! the first snapshot wins. Every stage is bounded by the same timeout, and a
//! timeout counts as that stage being unusable.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};

use crate::{
    Config,
    error::TierError,
    geocode::Geocoder,
    http::{HttpFetch, ReqwestFetcher},
    icon::resolve_icon,
    model::{GeoCoordinate, ResolutionOutcome, WeatherRequest},
    tier::{TierContext, TierId, WeatherTier, tiers_from_config},
};

/// The only failure text that reaches the user.
pub const UNAVAILABLE_MESSAGE: &str =
    "Weather data unavailable - please check your API key or try again later";

/// Outcome plus the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub outcome: ResolutionOutcome,
    pub source: Option<TierId>,
    pub resolved_at: DateTime<Utc>,
}

impl Resolved {
    fn exhausted() -> Self {
        Self {
            outcome: ResolutionOutcome::Failure {
                reason: UNAVAILABLE_MESSAGE.to_string(),
            },
            source: None,
            resolved_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub struct Resolver {
    geocoder: Geocoder,
    tiers: Vec<Box<dyn WeatherTier>>,
    stage_timeout: Duration,
}

impl Resolver {
    pub fn new(
        geocoder: Geocoder,
        tiers: Vec<Box<dyn WeatherTier>>,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            geocoder,
            tiers,
            stage_timeout,
        }
    }

    /// Production resolver talking to the configured endpoints over HTTP.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fetch: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(config.timeout())?);
        Ok(Self::with_fetch(config, fetch))
    }

    pub fn with_fetch(config: &Config, fetch: Arc<dyn HttpFetch>) -> Self {
        let geocoder = Geocoder::new(
            Arc::clone(&fetch),
            config.endpoints.geocode.clone(),
            config.api_key().map(str::to_owned),
        );
        let tiers = tiers_from_config(config, fetch);

        Self::new(geocoder, tiers, config.timeout())
    }

    pub fn tier_ids(&self) -> Vec<TierId> {
        self.tiers.iter().map(|t| t.id()).collect()
    }

    /// Current weather for `city`. Never fails: every upstream problem ends in
    /// [`ResolutionOutcome::Failure`] once all tiers are exhausted.
    pub async fn resolve_weather(
        &self,
        city: &str,
        country_code: Option<&str>,
    ) -> ResolutionOutcome {
        let request = WeatherRequest::new(city, country_code.map(str::to_owned));
        self.resolve_detailed(&request).await.outcome
    }

    pub async fn resolve_detailed(&self, request: &WeatherRequest) -> Resolved {
        if request.city.trim().is_empty() {
            tracing::debug!("empty city name, nothing to resolve");
            return Resolved::exhausted();
        }

        let coordinate = self.locate(request).await;
        let ctx = TierContext {
            request,
            coordinate,
        };

        for tier in &self.tiers {
            let id = tier.id();
            let attempt = tokio::time::timeout(self.stage_timeout, tier.attempt(&ctx)).await;

            match attempt.unwrap_or(Err(TierError::TimedOut(self.stage_timeout))) {
                Ok(mut snapshot) => {
                    snapshot.condition_icon_key = resolve_icon(&snapshot);
                    tracing::info!(tier = %id, city = %request.city, "weather resolved");
                    return Resolved {
                        outcome: ResolutionOutcome::Success(snapshot),
                        source: Some(id),
                        resolved_at: Utc::now(),
                    };
                }
                Err(err @ (TierError::MissingCoordinates | TierError::MissingApiKey)) => {
                    tracing::debug!(tier = %id, reason = %err, "tier skipped");
                }
                Err(err) => {
                    tracing::warn!(tier = %id, city = %request.city, error = %err, "tier unusable");
                }
            }
        }

        tracing::warn!(city = %request.city, "all weather tiers exhausted");
        Resolved::exhausted()
    }

    async fn locate(&self, request: &WeatherRequest) -> Option<GeoCoordinate> {
        match tokio::time::timeout(self.stage_timeout, self.geocoder.geocode(request)).await {
            Ok(Ok(Some(coord))) => Some(coord),
            Ok(Ok(None)) => {
                tracing::debug!(query = %request.query(), "no geocoding match");
                None
            }
            Ok(Err(err)) => {
                tracing::warn!(query = %request.query(), error = %err, "geocoding failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    query = %request.query(),
                    timeout = ?self.stage_timeout,
                    "geocoding timed out"
                );
                None
            }
        }
    }
}
