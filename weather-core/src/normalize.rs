//! Per-tier mapping from raw upstream JSON to [`WeatherSnapshot`].
//!
//! Each mapping is all-or-nothing: a payload missing any required numeric
//! field yields a [`NormalizeError`] and never a snapshot with placeholder data.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{error::NormalizeError, icon, model::WeatherSnapshot, tier::TierId};

/// km/h per m/s.
const KMH_PER_MS: f64 = 3.6;

pub fn normalize(tier: TierId, payload: &Value) -> Result<WeatherSnapshot, NormalizeError> {
    match tier {
        TierId::OneCall => normalize_onecall(payload),
        TierId::Direct => normalize_direct(payload),
        TierId::Wttr => normalize_wttr(payload),
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    #[serde(default)]
    id: Option<u16>,
    description: String,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcCurrent {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
    wind_speed: f64,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OcResponse {
    current: OcCurrent,
}

#[derive(Debug, Deserialize)]
struct DirMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct DirWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct DirResponse {
    main: DirMain,
    wind: DirWind,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

/// wttr.in reports numbers as strings; accept either form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
}

impl Lenient {
    fn to_f64(&self, tier: &'static str, field: &'static str) -> Result<f64, NormalizeError> {
        let not_numeric = |value: String| NormalizeError::NotNumeric {
            tier,
            field,
            value,
        };

        let value = match self {
            Lenient::Number(n) => *n,
            Lenient::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => return Err(not_numeric(s.clone())),
            },
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(not_numeric(value.to_string()))
        }
    }
}

#[derive(Debug, Deserialize)]
struct WttrText {
    value: String,
}

#[derive(Debug, Deserialize)]
struct WttrCurrent {
    #[serde(rename = "temp_C")]
    temp_c: Lenient,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: Lenient,
    humidity: Lenient,
    pressure: Lenient,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: Lenient,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<WttrText>,
}

#[derive(Debug, Deserialize)]
struct WttrResponse {
    #[serde(default)]
    current_condition: Vec<WttrCurrent>,
}

fn parse<T: DeserializeOwned>(tier: TierId, payload: &Value) -> Result<T, NormalizeError> {
    T::deserialize(payload).map_err(|source| NormalizeError::Shape {
        tier: tier.as_str(),
        source,
    })
}

fn normalize_onecall(payload: &Value) -> Result<WeatherSnapshot, NormalizeError> {
    let tier = TierId::OneCall;
    let parsed: OcResponse = parse(tier, payload)?;
    let current = parsed.current;
    let condition = first_condition(tier, &current.weather)?;

    Ok(WeatherSnapshot {
        temperature_c: current.temp,
        feels_like_c: current.feels_like,
        humidity_pct: humidity(tier, current.humidity)?,
        pressure_hpa: pressure(tier, current.pressure)?,
        wind_speed_ms: current.wind_speed,
        condition_description: condition.description.clone(),
        condition_icon_key: provider_icon(condition),
        condition_code: condition.id,
    })
}

fn normalize_direct(payload: &Value) -> Result<WeatherSnapshot, NormalizeError> {
    let tier = TierId::Direct;
    let parsed: DirResponse = parse(tier, payload)?;
    let condition = first_condition(tier, &parsed.weather)?;

    Ok(WeatherSnapshot {
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: humidity(tier, parsed.main.humidity)?,
        pressure_hpa: pressure(tier, parsed.main.pressure)?,
        wind_speed_ms: parsed.wind.speed,
        condition_description: condition.description.clone(),
        condition_icon_key: provider_icon(condition),
        condition_code: condition.id,
    })
}

fn normalize_wttr(payload: &Value) -> Result<WeatherSnapshot, NormalizeError> {
    let tier = TierId::Wttr;
    let name = tier.as_str();
    let parsed: WttrResponse = parse(tier, payload)?;
    let current = parsed
        .current_condition
        .first()
        .ok_or_else(|| missing(tier, "current_condition[0]"))?;

    let description = current
        .weather_desc
        .first()
        .map(|d| d.value.trim().to_string())
        .ok_or_else(|| missing(tier, "weatherDesc[0].value"))?;

    let wind_kmh = current.windspeed_kmph.to_f64(name, "windspeedKmph")?;

    Ok(WeatherSnapshot {
        temperature_c: current.temp_c.to_f64(name, "temp_C")?,
        feels_like_c: current.feels_like_c.to_f64(name, "FeelsLikeC")?,
        humidity_pct: humidity(tier, current.humidity.to_f64(name, "humidity")?)?,
        pressure_hpa: pressure(tier, current.pressure.to_f64(name, "pressure")?)?,
        wind_speed_ms: wind_kmh / KMH_PER_MS,
        condition_description: description,
        // No icon vocabulary upstream.
        condition_icon_key: icon::DEFAULT.to_string(),
        condition_code: None,
    })
}

fn missing(tier: TierId, field: &'static str) -> NormalizeError {
    NormalizeError::Missing {
        tier: tier.as_str(),
        field,
    }
}

fn out_of_range(tier: TierId, field: &'static str, value: f64) -> NormalizeError {
    NormalizeError::OutOfRange {
        tier: tier.as_str(),
        field,
        value,
    }
}

fn first_condition(
    tier: TierId,
    weather: &[OwCondition],
) -> Result<&OwCondition, NormalizeError> {
    weather.first().ok_or_else(|| missing(tier, "weather[0]"))
}

fn provider_icon(condition: &OwCondition) -> String {
    condition
        .icon
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

fn humidity(tier: TierId, value: f64) -> Result<u8, NormalizeError> {
    let rounded = value.round();
    if (0.0..=100.0).contains(&rounded) {
        Ok(rounded as u8)
    } else {
        Err(out_of_range(tier, "humidity", value))
    }
}

fn pressure(tier: TierId, value: f64) -> Result<u32, NormalizeError> {
    let rounded = value.round();
    if rounded >= 0.0 && rounded <= f64::from(u32::MAX) {
        Ok(rounded as u32)
    } else {
        Err(out_of_range(tier, "pressure", value))
    }
}
