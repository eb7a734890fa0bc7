use serde::{Deserialize, Serialize};

/// A "show weather for this place" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: String,
    /// ISO 3166 alpha-2 code used to disambiguate same-named cities.
    pub country_code: Option<String>,
}

impl WeatherRequest {
    pub fn new(city: impl Into<String>, country_code: Option<String>) -> Self {
        Self {
            city: city.into(),
            country_code: country_code.filter(|c| !c.trim().is_empty()),
        }
    }

    /// `"city"` or `"city,CC"`, the query form the name-based lookups expect.
    pub fn query(&self) -> String {
        match &self.country_code {
            Some(cc) => format!("{},{}", self.city, cc),
            None => self.city.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Canonical current-conditions record, independent of the producing tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_ms: f64,
    pub condition_description: String,
    /// Provider-style icon code such as `"10n"`. Empty until the icon resolver
    /// has run when the producing tier had none.
    pub condition_icon_key: String,
    /// Provider numeric condition id (e.g. 201), when the tier reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Success(WeatherSnapshot),
    Failure { reason: String },
}

impl ResolutionOutcome {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            ResolutionOutcome::Success(snapshot) => Some(snapshot),
            ResolutionOutcome::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionOutcome::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_includes_country_code_when_present() {
        let req = WeatherRequest::new("Helsinki", Some("FI".into()));
        assert_eq!(req.query(), "Helsinki,FI");

        let req = WeatherRequest::new("Helsinki", None);
        assert_eq!(req.query(), "Helsinki");
    }

    #[test]
    fn blank_country_code_is_dropped() {
        let req = WeatherRequest::new("Oslo", Some("  ".into()));
        assert_eq!(req.country_code, None);
        assert_eq!(req.query(), "Oslo");
    }
}
