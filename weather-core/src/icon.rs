//! Display icon selection.

use crate::model::WeatherSnapshot;

pub const THUNDERSTORM: &str = "11d";
pub const DRIZZLE: &str = "09d";
pub const RAIN: &str = "10d";
pub const SNOW: &str = "13d";
pub const ATMOSPHERE: &str = "50d";
pub const CLEAR: &str = "01d";
pub const CLOUDS: &str = "02d";

/// "clear sky", used whenever nothing better is known.
pub const DEFAULT: &str = CLEAR;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Description keywords, checked in order.
const KEYWORDS: &[(&[&str], &str)] = &[
    (&["clear"], CLEAR),
    (&["cloud"], CLOUDS),
    (&["rain"], RAIN),
    (&["snow"], SNOW),
    (&["thunder"], THUNDERSTORM),
    (&["mist", "fog"], ATMOSPHERE),
    (&["drizzle"], DRIZZLE),
];

/// Picks the icon key for a snapshot.
///
/// First match wins: the provider's own icon code, then the numeric
/// condition code, then keywords in the description, then [`DEFAULT`].
pub fn resolve_icon(snapshot: &WeatherSnapshot) -> String {
    let explicit = snapshot.condition_icon_key.trim();
    if !explicit.is_empty() {
        return explicit.to_string();
    }

    snapshot
        .condition_code
        .and_then(icon_for_code)
        .or_else(|| icon_for_description(&snapshot.condition_description))
        .unwrap_or(DEFAULT)
        .to_string()
}

pub fn icon_for_code(code: u16) -> Option<&'static str> {
    match code {
        200..=299 => Some(THUNDERSTORM),
        300..=399 => Some(DRIZZLE),
        500..=599 => Some(RAIN),
        600..=699 => Some(SNOW),
        700..=799 => Some(ATMOSPHERE),
        800 => Some(CLEAR),
        801..=804 => Some(CLOUDS),
        _ => None,
    }
}

pub fn icon_for_description(description: &str) -> Option<&'static str> {
    let lower = description.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, icon)| *icon)
}

/// Image URL for an icon key, e.g. `https://openweathermap.org/img/wn/10n@2x.png`.
pub fn icon_url(key: &str) -> String {
    format!("{ICON_BASE_URL}/{key}@2x.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(icon: &str, code: Option<u16>, description: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: 1.0,
            feels_like_c: 1.0,
            humidity_pct: 50,
            pressure_hpa: 1000,
            wind_speed_ms: 1.0,
            condition_description: description.to_string(),
            condition_icon_key: icon.to_string(),
            condition_code: code,
        }
    }

    #[test]
    fn explicit_icon_wins_over_everything() {
        let snap = snapshot("10n", Some(800), "clear sky");
        assert_eq!(resolve_icon(&snap), "10n");
    }

    #[test]
    fn code_is_used_when_icon_missing() {
        assert_eq!(resolve_icon(&snapshot("", Some(201), "clear sky")), THUNDERSTORM);
        assert_eq!(resolve_icon(&snapshot("", Some(311), "")), DRIZZLE);
        assert_eq!(resolve_icon(&snapshot("", Some(502), "")), RAIN);
        assert_eq!(resolve_icon(&snapshot("", Some(601), "")), SNOW);
        assert_eq!(resolve_icon(&snapshot("", Some(741), "")), ATMOSPHERE);
        assert_eq!(resolve_icon(&snapshot("", Some(800), "")), CLEAR);
        assert_eq!(resolve_icon(&snapshot("", Some(804), "")), CLOUDS);
    }

    #[test]
    fn unmapped_code_falls_through_to_description() {
        // 400s and 805+ have no range.
        assert_eq!(resolve_icon(&snapshot("", Some(450), "heavy snow")), SNOW);
        assert_eq!(resolve_icon(&snapshot("", Some(900), "")), DEFAULT);
    }

    #[test]
    fn description_match_is_case_insensitive() {
        assert_eq!(resolve_icon(&snapshot("", None, "Light Cloud")), CLOUDS);
        assert_eq!(resolve_icon(&snapshot("", None, "Patchy FOG")), ATMOSPHERE);
        assert_eq!(resolve_icon(&snapshot("", None, "Thundery outbreaks")), THUNDERSTORM);
    }

    #[test]
    fn description_keywords_follow_fixed_priority() {
        // "rain" is checked before "thunder" and "drizzle".
        assert_eq!(resolve_icon(&snapshot("", None, "Thunderstorm with rain")), RAIN);
        assert_eq!(resolve_icon(&snapshot("", None, "freezing drizzle, rain")), RAIN);
        assert_eq!(resolve_icon(&snapshot("", None, "Light drizzle")), DRIZZLE);
    }

    #[test]
    fn nothing_known_yields_default() {
        assert_eq!(resolve_icon(&snapshot("  ", None, "Sunny")), DEFAULT);
    }

    #[test]
    fn icon_url_points_at_double_size_png() {
        assert_eq!(icon_url("10n"), "https://openweathermap.org/img/wn/10n@2x.png");
    }
}
