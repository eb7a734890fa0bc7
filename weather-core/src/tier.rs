use crate::{
    Config, WeatherRequest, WeatherSnapshot,
    error::TierError,
    http::HttpFetch,
    model::GeoCoordinate,
    tier::{direct::DirectTier, onecall::OneCallTier, wttr::WttrTier},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod direct;
pub mod onecall;
pub mod wttr;

/// Upstream weather strategies, richest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierId {
    /// Coordinate-based "one call" current conditions.
    OneCall,
    /// Name-based current weather.
    Direct,
    /// Key-less wttr.in.
    Wttr,
}

impl TierId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierId::OneCall => "onecall",
            TierId::Direct => "direct",
            TierId::Wttr => "wttr",
        }
    }

    /// Fallback order.
    pub const fn all() -> &'static [TierId] {
        &[TierId::OneCall, TierId::Direct, TierId::Wttr]
    }
}

impl std::fmt::Display for TierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a tier may use to answer one request.
#[derive(Debug, Clone, Copy)]
pub struct TierContext<'a> {
    pub request: &'a WeatherRequest,
    /// Present only when geocoding found the city.
    pub coordinate: Option<GeoCoordinate>,
}

#[async_trait]
pub trait WeatherTier: Send + Sync + Debug {
    fn id(&self) -> TierId;

    /// One attempt, never retried. `Err` means "unusable for this request".
    async fn attempt(&self, ctx: &TierContext<'_>) -> Result<WeatherSnapshot, TierError>;
}

/// Construct one tier from config and explicit TierId.
pub fn tier_from_config(
    id: TierId,
    config: &Config,
    fetch: Arc<dyn HttpFetch>,
) -> Box<dyn WeatherTier> {
    let api_key = config.api_key().map(str::to_owned);
    let endpoints = &config.endpoints;

    match id {
        TierId::OneCall => Box::new(OneCallTier::new(fetch, endpoints.onecall.clone(), api_key)),
        TierId::Direct => Box::new(DirectTier::new(fetch, endpoints.current.clone(), api_key)),
        TierId::Wttr => Box::new(WttrTier::new(fetch, endpoints.wttr.clone())),
    }
}

/// The full fallback chain in [`TierId::all`] order.
pub fn tiers_from_config(
    config: &Config,
    fetch: Arc<dyn HttpFetch>,
) -> Vec<Box<dyn WeatherTier>> {
    TierId::all()
        .iter()
        .map(|id| tier_from_config(*id, config, Arc::clone(&fetch)))
        .collect()
}
