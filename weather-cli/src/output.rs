use chrono::{DateTime, Local};
use weather_core::{TierId, WeatherView, country::CountrySummary, icon::icon_url};

/// Whole degrees / m/s, without a "-0".
fn whole(value: f64) -> i64 {
    value.round() as i64
}

pub fn render_weather(
    place: &str,
    view: &WeatherView,
    source: Option<TierId>,
    at: DateTime<Local>,
) -> String {
    let mut out = format!("Weather in {place}\n");

    match view {
        WeatherView::Idle => out.push_str("  (no weather requested)\n"),
        WeatherView::Loading { .. } => out.push_str("  Loading weather data...\n"),
        WeatherView::Unavailable { message, .. } => out.push_str(&format!("  {message}\n")),
        WeatherView::Ready { snapshot, .. } => {
            out.push_str(&format!(
                "  {}°C  {}\n",
                whole(snapshot.temperature_c),
                snapshot.condition_description
            ));
            out.push_str(&format!("  Feels like: {}°C\n", whole(snapshot.feels_like_c)));
            out.push_str(&format!("  Humidity:   {}%\n", snapshot.humidity_pct));
            out.push_str(&format!("  Wind:       {} m/s\n", whole(snapshot.wind_speed_ms)));
            out.push_str(&format!("  Pressure:   {} hPa\n", snapshot.pressure_hpa));
            out.push_str(&format!("  Icon:       {}\n", icon_url(&snapshot.condition_icon_key)));
            if let Some(source) = source {
                out.push_str(&format!("  Source:     {source}\n"));
            }
            out.push_str(&format!("  Updated:    {}\n", at.format("%Y-%m-%d %H:%M")));
        }
    }

    out
}

pub fn render_country(country: &CountrySummary) -> String {
    let mut out = format!("{}\n", country.common_name);
    if let Some(official) = &country.official_name {
        out.push_str(&format!("  Official name: {official}\n"));
    }
    let capital = country.capital.as_deref().unwrap_or("N/A");
    let code = country.country_code.as_deref().unwrap_or("N/A");
    out.push_str(&format!("  Capital:       {capital}\n"));
    out.push_str(&format!("  Code:          {code}\n"));
    out
}
