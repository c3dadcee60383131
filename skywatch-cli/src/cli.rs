use anyhow::bail;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use inquire::Text;
use skywatch_core::{
    Config, HttpTransport, OpenWeatherProvider, WeatherProvider, WeatherSnapshot,
};
use std::sync::Arc;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about = "OpenWeatherMap snapshot CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a personal OpenWeatherMap API key. It takes precedence over any
    /// provisioned key pool.
    Configure,

    /// Show current conditions and the 5-day forecast.
    Show {
        /// Free-form location selector, e.g. "q=London" or "id=2643743".
        /// Ignored when --lat/--lon are given.
        selector: Option<String>,

        /// Latitude; must be paired with --lon.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude; must be paired with --lat.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Report temperatures in Fahrenheit and wind in the provider's
        /// native unit.
        #[arg(long)]
        imperial: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { selector, lat, lon, imperial } => {
                show(selector, lat, lon, !imperial).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Text::new("OpenWeatherMap API key:").prompt()?;
    config.set_user_api_key(key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    selector: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    metric: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let transport = Arc::new(HttpTransport::new()?);
    let provider = OpenWeatherProvider::new(&config, transport);

    let snapshot = match (selector, lat, lon) {
        (_, Some(lat), Some(lon)) => provider.fetch_by_coordinates(lat, lon, metric).await,
        (Some(selector), None, None) => provider.fetch_by_location(&selector, metric).await,
        _ => bail!("Provide a location selector or a --lat/--lon pair"),
    };

    match snapshot {
        Some(snapshot) => {
            print_snapshot(&snapshot);
            Ok(())
        }
        None => bail!(
            "No weather available. Check your API key (`skywatch configure`) and the selector."
        ),
    }
}

fn print_snapshot(snapshot: &WeatherSnapshot) {
    let (temp_unit, speed_unit) = if snapshot.is_metric {
        ("°C", "km/h")
    } else {
        ("°F", "m/s")
    };

    let as_of = DateTime::<Utc>::from_timestamp_millis(snapshot.timestamp)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default();

    println!(
        "{} — {} (code {})  as of {as_of}",
        snapshot.locality, snapshot.condition_text, snapshot.condition_code
    );
    println!(
        "  {:.1}{temp_unit}   humidity {:.0}%   wind {:.1} {speed_unit} @ {}°",
        snapshot.temperature, snapshot.humidity, snapshot.wind_speed, snapshot.wind_direction
    );

    println!();
    for day in &snapshot.forecasts {
        println!(
            "  {:<10} {:>6.1}{temp_unit} / {:>6.1}{temp_unit}  {}",
            day.day_label, day.low, day.high, day.condition_text
        );
    }
}
