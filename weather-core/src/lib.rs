//! Core library for the countries-browser weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The tiered weather pipeline (geocoder, three upstream tiers, normalizer,
//!   icon resolver) behind a single [`Resolver`]
//! - The session guard that keeps late results from overwriting newer ones
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod country;
pub mod error;
pub mod geocode;
pub mod http;
pub mod icon;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod session;
pub mod tier;

pub use config::{Config, Endpoints};
pub use icon::resolve_icon;
pub use model::{GeoCoordinate, ResolutionOutcome, WeatherRequest, WeatherSnapshot};
pub use pipeline::{Resolved, Resolver, UNAVAILABLE_MESSAGE};
pub use session::{ResolutionId, WeatherSession, WeatherView};
pub use tier::{TierId, WeatherTier};
