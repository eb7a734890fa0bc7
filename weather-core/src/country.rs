use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    http::{HttpFetch, join_segment},
    model::WeatherRequest,
};

#[derive(Debug, Deserialize)]
struct RcName {
    common: String,
    #[serde(default)]
    official: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RcCountry {
    name: RcName,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    cca2: Option<String>,
}

/// The parts of a country record needed to show its capital's weather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    pub common_name: String,
    pub official_name: Option<String>,
    pub capital: Option<String>,
    pub country_code: Option<String>,
}

impl CountrySummary {
    /// Weather request for the first capital, if the country has one.
    pub fn capital_request(&self) -> Option<WeatherRequest> {
        self.capital
            .as_ref()
            .map(|capital| WeatherRequest::new(capital.clone(), self.country_code.clone()))
    }
}

/// Looks a country up by name. `Ok(None)` when the service has no match.
pub async fn lookup_country(
    fetch: &dyn HttpFetch,
    endpoint: &str,
    name: &str,
) -> anyhow::Result<Option<CountrySummary>> {
    let url = join_segment(endpoint, name.trim())?;

    let body = match fetch.get_json(&url, &[]).await {
        Ok(body) => body,
        Err(err) if err.status() == Some(404) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    summarize(body)
}

fn summarize(body: Value) -> anyhow::Result<Option<CountrySummary>> {
    // Exact-name lookups answer with one object, searches with an array.
    let country: Option<RcCountry> = match body {
        Value::Array(items) => match items.into_iter().next() {
            Some(item) => Some(serde_json::from_value(item)?),
            None => None,
        },
        other => Some(serde_json::from_value(other)?),
    };

    Ok(country.map(|c| CountrySummary {
        common_name: c.name.common,
        official_name: c.name.official,
        capital: c.capital.into_iter().find(|cap| !cap.trim().is_empty()),
        country_code: c.cca2,
    }))
}
