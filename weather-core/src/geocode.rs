use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{FetchError, GeocodeError},
    http::HttpFetch,
    model::{GeoCoordinate, WeatherRequest},
};

#[derive(Debug, Deserialize)]
struct GeoMatch {
    #[serde(default, alias = "latitude")]
    lat: Option<f64>,
    #[serde(default, alias = "longitude")]
    lon: Option<f64>,
}

/// Resolves a city (optionally narrowed by country code) to coordinates.
#[derive(Debug, Clone)]
pub struct Geocoder {
    fetch: Arc<dyn HttpFetch>,
    endpoint: String,
    api_key: Option<String>,
}

impl Geocoder {
    pub fn new(
        fetch: Arc<dyn HttpFetch>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            fetch,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Best match for the request, or `Ok(None)` when there is none.
    ///
    /// A non-success status, an empty result list and a match lacking either
    /// coordinate all count as "not found". Transport failures and bodies that
    /// are not a JSON array are faults.
    pub async fn geocode(
        &self,
        request: &WeatherRequest,
    ) -> Result<Option<GeoCoordinate>, GeocodeError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("geocoding skipped: no API key configured");
            return Ok(None);
        };

        let query = [
            ("q", request.query()),
            ("limit", "1".to_string()),
            ("appid", api_key.to_string()),
        ];

        let body = match self.fetch.get_json(&self.endpoint, &query).await {
            Ok(body) => body,
            Err(FetchError::Status { status, .. }) => {
                tracing::debug!(
                    status,
                    query = %request.query(),
                    "geocoding returned non-success status"
                );
                return Ok(None);
            }
            Err(FetchError::Decode { message, .. }) => {
                return Err(GeocodeError::Malformed(message));
            }
            Err(err) => return Err(GeocodeError::Transport(err)),
        };

        first_match(body)
    }
}

fn first_match(body: Value) -> Result<Option<GeoCoordinate>, GeocodeError> {
    let matches: Vec<GeoMatch> =
        serde_json::from_value(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    let coordinate = matches.into_iter().next().and_then(|m| match (m.lat, m.lon) {
        (Some(latitude), Some(longitude)) => Some(GeoCoordinate {
            latitude,
            longitude,
        }),
        _ => None,
    });

    Ok(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn takes_first_match() {
        let body = json!([
            { "name": "Helsinki", "lat": 60.17, "lon": 24.94, "country": "FI" },
            { "name": "Helsinki", "lat": 1.0, "lon": 2.0 }
        ]);

        let coord = first_match(body).unwrap().unwrap();
        assert_eq!(
            coord,
            GeoCoordinate {
                latitude: 60.17,
                longitude: 24.94,
            }
        );
    }

    #[test]
    fn accepts_long_field_names() {
        let body = json!([{ "latitude": -33.87, "longitude": 151.21 }]);
        let coord = first_match(body).unwrap().unwrap();
        assert_eq!(coord.latitude, -33.87);
    }

    #[test]
    fn empty_list_is_not_found() {
        assert_eq!(first_match(json!([])).unwrap(), None);
    }

    #[test]
    fn half_a_coordinate_is_not_found() {
        assert_eq!(first_match(json!([{ "lat": 60.17 }])).unwrap(), None);
        assert_eq!(first_match(json!([{ "lon": 24.94 }])).unwrap(), None);
    }

    #[test]
    fn non_array_body_is_malformed() {
        let err = first_match(json!({ "cod": 401 })).unwrap_err();
        assert!(matches!(err, GeocodeError::Malformed(_)));
    }
}
