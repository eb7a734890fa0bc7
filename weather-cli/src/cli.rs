use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use weather_core::{
    Config, Resolver, WeatherRequest, WeatherSession, WeatherView,
    country::{CountrySummary, lookup_country},
    http::{HttpFetch, ReqwestFetcher},
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for cities and country capitals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and request timeout.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name.
        city: String,

        /// ISO country code used to disambiguate the city, e.g. "FI".
        #[arg(long, short)]
        country: Option<String>,

        /// Print machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a country and the weather in its capital.
    Country {
        /// Country name, e.g. "finland".
        name: String,

        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, country, json } => {
                let cfg = load_config()?;
                let resolver = Resolver::from_config(&cfg)?;
                let request = WeatherRequest::new(city, country);
                show_weather(&resolver, &request, None, json).await
            }
            Command::Country { name, json } => {
                let cfg = load_config()?;
                let fetch: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(cfg.timeout())?);

                let country = lookup_country(fetch.as_ref(), &cfg.endpoints.countries, &name)
                    .await
                    .with_context(|| format!("Failed to look up country '{name}'"))?;
                let Some(country) = country else {
                    bail!("No country found matching \"{name}\"");
                };

                let Some(request) = country.capital_request() else {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&country)?);
                    } else {
                        println!("{}", output::render_country(&country));
                    }
                    return Ok(());
                };

                if !json {
                    println!("{}", output::render_country(&country));
                }

                let resolver = Resolver::with_fetch(&cfg, fetch);
                show_weather(&resolver, &request, Some(&country), json).await
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    let cfg = Config::load_with_env()?;
    tracing::debug!(
        endpoints = ?cfg.endpoints,
        has_api_key = cfg.api_key().is_some(),
        timeout = ?cfg.timeout(),
        "configuration loaded"
    );
    Ok(cfg)
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("API key (leave empty for key-less mode):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    cfg.set_api_key(api_key);

    cfg.timeout_secs = CustomType::<u64>::new("Timeout per upstream call (seconds):")
        .with_default(cfg.timeout_secs)
        .prompt()
        .context("Failed to read timeout")?;

    cfg.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show_weather(
    resolver: &Resolver,
    request: &WeatherRequest,
    country: Option<&CountrySummary>,
    json: bool,
) -> anyhow::Result<()> {
    let session = WeatherSession::new();
    let id = session.begin();
    if !json {
        eprintln!("Loading weather data...");
    }

    let resolved = resolver.resolve_detailed(request).await;
    session.complete(id, resolved.outcome);
    let view = session.view();

    if json {
        let mut doc = serde_json::json!({
            "city": request.city,
            "country_code": request.country_code,
            "source": resolved.source.map(|s| s.as_str()),
            "resolved_at": resolved.resolved_at.to_rfc3339(),
            "weather": view,
        });
        if let Some(country) = country {
            doc["country"] = serde_json::to_value(country)?;
        }
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }

    if let WeatherView::Unavailable { message, .. } = &view {
        bail!("{message}");
    }

    if !json {
        let text = output::render_weather(
            &request.city,
            &view,
            resolved.source,
            resolved.resolved_at.with_timezone(&Local),
        );
        println!("{text}");
    }

    Ok(())
}
