use thiserror::Error;

/// Failure of a single upstream HTTP request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },

    #[error("invalid request URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A payload could not be turned into a complete snapshot.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{tier} payload has unexpected shape: {source}")]
    Shape {
        tier: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{tier} payload is missing `{field}`")]
    Missing {
        tier: &'static str,
        field: &'static str,
    },

    #[error("{tier} payload field `{field}` is not numeric: {value:?}")]
    NotNumeric {
        tier: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{tier} payload field `{field}` is out of range: {value}")]
    OutOfRange {
        tier: &'static str,
        field: &'static str,
        value: f64,
    },
}

/// Geocoding fault. "No match" is not an error; see [`crate::geocode::Geocoder::geocode`].
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding transport failure: {0}")]
    Transport(#[source] FetchError),

    #[error("geocoding response is malformed: {0}")]
    Malformed(String),
}

/// Reason a tier could not produce a snapshot for one request.
#[derive(Debug, Error)]
pub enum TierError {
    #[error("no coordinates available")]
    MissingCoordinates,

    #[error("no API key configured")]
    MissingApiKey,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("timed out after {0:?}")]
    TimedOut(std::time::Duration),
}
