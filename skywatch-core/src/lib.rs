//! Core library for the `skywatch` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling (key pool, override, legacy key)
//! - The normalized snapshot model handed to display code
//! - The OpenWeatherMap provider and its normalization pipeline
//!
//! It is used by `skywatch-cli`, but can also be reused by other binaries or services.

pub mod conditions;
pub mod config;
pub mod model;
pub mod normalize;
pub mod provider;

pub use config::Config;
pub use model::{DayForecast, FORECAST_DAYS, WeatherSnapshot};
pub use provider::openweather::OpenWeatherProvider;
pub use provider::{HttpTransport, LocalityResolver, Transport, WeatherProvider};
