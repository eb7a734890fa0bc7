#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;
use weather_core::{Config, Endpoints, error::FetchError, http::HttpFetch};

pub const GEOCODE: &str = "http://geo.test/direct";
pub const ONECALL: &str = "http://onecall.test/onecall";
pub const CURRENT: &str = "http://current.test/weather";
pub const WTTR: &str = "http://wttr.test";
pub const COUNTRIES: &str = "http://countries.test/name";

pub fn config(api_key: Option<&str>) -> Config {
    Config {
        api_key: api_key.map(str::to_owned),
        timeout_secs: 5,
        endpoints: Endpoints {
            geocode: GEOCODE.into(),
            onecall: ONECALL.into(),
            current: CURRENT.into(),
            wttr: WTTR.into(),
            countries: COUNTRIES.into(),
        },
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Transport,
    Malformed,
    /// Never answers.
    Hang,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// In-memory upstream: fixed replies per exact URL, every call recorded.
#[derive(Debug, Default)]
pub struct ScriptedFetch {
    replies: Mutex<HashMap<String, Reply>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedFetch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, url: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
    }

    /// Holds replies for `url` until the returned handle is notified.
    pub fn gate(&self, url: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(url.to_string(), Arc::clone(&notify));
        notify
    }

    pub fn calls_to(&self, url: &str) -> Vec<Call> {
        self.calls.lock().unwrap().iter().filter(|c| c.url == url).cloned().collect()
    }

    pub fn count(&self, url: &str) -> usize {
        self.calls_to(url).len()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpFetch for ScriptedFetch {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        });

        let gate = self.gates.lock().unwrap().get(url).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let reply = self.replies.lock().unwrap().get(url).cloned().unwrap_or(Reply::Transport);
        match reply {
            Reply::Json(body) => Ok(body),
            Reply::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status,
                body: String::new(),
            }),
            Reply::Transport => Err(FetchError::Transport {
                url: url.to_string(),
                message: "connection refused".into(),
            }),
            Reply::Malformed => Err(FetchError::Decode {
                url: url.to_string(),
                message: "expected value at line 1 column 1".into(),
            }),
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub fn wttr_url(city: &str) -> String {
    weather_core::http::join_segment(WTTR, city).unwrap()
}

pub fn geo_match(lat: f64, lon: f64) -> Value {
    json!([{ "name": "somewhere", "lat": lat, "lon": lon, "country": "XX" }])
}

pub fn onecall_body(temp: f64, id: u16, description: &str, icon: Option<&str>) -> Value {
    let mut weather = json!({ "id": id, "main": "x", "description": description });
    if let Some(icon) = icon {
        weather["icon"] = json!(icon);
    }

    json!({
        "lat": 60.17,
        "lon": 24.94,
        "timezone": "Europe/Helsinki",
        "current": {
            "dt": 1_700_000_000,
            "temp": temp,
            "feels_like": temp - 2.0,
            "humidity": 81,
            "pressure": 1015,
            "wind_speed": 3.1,
            "weather": [weather]
        }
    })
}

pub fn current_body(temp: f64) -> Value {
    json!({
        "name": "Helsinki",
        "main": { "temp": temp, "feels_like": temp - 3.1, "humidity": 70, "pressure": 1004 },
        "wind": { "speed": 5.7, "deg": 200 },
        "weather": [{
            "id": 804,
            "main": "Clouds",
            "description": "overcast clouds",
            "icon": "04n"
        }]
    })
}

pub fn wttr_body(temp_c: &str, wind_kmph: &str, description: &str) -> Value {
    json!({
        "current_condition": [{
            "temp_C": temp_c,
            "FeelsLikeC": temp_c,
            "humidity": "64",
            "pressure": "1018",
            "windspeedKmph": wind_kmph,
            "weatherDesc": [{ "value": description }]
        }],
        "nearest_area": []
    })
}
