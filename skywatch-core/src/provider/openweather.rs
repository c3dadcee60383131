use async_trait::async_trait;
use chrono::{Duration, Local, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tracing::{debug, warn};

use crate::{
    conditions::map_condition,
    config::Config,
    model::{DayForecast, FORECAST_DAYS, WeatherSnapshot},
    normalize::{resolve_language, sanitize_temperature},
    provider::{FetchError, LocalityResolver, NoLocality, Transport, WeatherProvider},
};

const URL_WEATHER: &str = "https://api.openweathermap.org/data/3.0/onecall";

/// OpenWeatherMap one-call provider. Builds the request, rotates API keys,
/// and normalizes the response into a [`WeatherSnapshot`].
#[derive(Debug)]
pub struct OpenWeatherProvider {
    keys: KeyRing,
    locale: String,
    transport: Arc<dyn Transport>,
    locality: Arc<dyn LocalityResolver>,
}

impl OpenWeatherProvider {
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            keys: KeyRing::from_config(config),
            locale: config.locale_or_default().to_string(),
            transport,
            locality: Arc::new(NoLocality),
        }
    }

    /// Install a locality resolver; without one, snapshots echo the selector
    /// as the locality.
    #[must_use]
    pub fn with_locality_resolver(mut self, resolver: Arc<dyn LocalityResolver>) -> Self {
        self.locality = resolver;
        self
    }

    async fn handle_request(
        &self,
        selector: &str,
        metric: bool,
    ) -> Result<WeatherSnapshot, FetchError> {
        let lang = resolve_language(&self.locale);
        let key = self.keys.next_key().ok_or(FetchError::NoApiKey)?;
        let units = if metric { "metric" } else { "imperial" };
        let url = format!(
            "{URL_WEATHER}?{selector}&mode=json&units={units}&lang={lang}&cnt={FORECAST_DAYS}&appid={key}"
        );

        let body = self
            .transport
            .retrieve(&url)
            .await
            .ok_or(FetchError::Transport)?;
        debug!(selector, lang, "received conditions response");

        parse_snapshot(&body, selector, lang, metric, self.locality.as_ref())
    }

    async fn run(&self, selector: &str, metric: bool) -> Option<WeatherSnapshot> {
        match self.handle_request(selector, metric).await {
            Ok(snapshot) => {
                debug!(selector, "weather updated");
                Some(snapshot)
            }
            Err(err) => {
                warn!(selector, %err, "weather request yielded no result");
                None
            }
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_by_location(&self, selector: &str, metric: bool) -> Option<WeatherSnapshot> {
        self.run(selector, metric).await
    }

    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        metric: bool,
    ) -> Option<WeatherSnapshot> {
        let selector = format!("lat={lat}&lon={lon}");
        self.run(&selector, metric).await
    }

    fn should_retry(&self) -> bool {
        false
    }
}

/// API key sources in precedence order, plus the shared round-robin counter.
#[derive(Debug)]
struct KeyRing {
    user_key: Option<String>,
    pool: Vec<String>,
    legacy_key: Option<String>,
    request_counter: AtomicUsize,
}

impl KeyRing {
    fn from_config(config: &Config) -> Self {
        let pool = config.key_pool();
        debug!(pool_size = pool.len(), "loaded API key pool");

        Self {
            user_key: non_empty(config.user_api_key.clone()),
            pool,
            legacy_key: non_empty(config.legacy_api_key.clone()),
            request_counter: AtomicUsize::new(0),
        }
    }

    /// Select a key for one request attempt. The counter advances on every
    /// attempt, key or no key, so pool cycling stays deterministic when
    /// callers retry after a rejection.
    fn next_key(&self) -> Option<&str> {
        let n = self.request_counter.fetch_add(1, Ordering::Relaxed);

        if let Some(key) = self.user_key.as_deref() {
            return Some(key);
        }
        if !self.pool.is_empty() {
            let index = n % self.pool.len();
            debug!(index, "using pooled API key");
            return Some(self.pool[index].as_str());
        }
        self.legacy_key.as_deref()
    }
}

fn non_empty(key: Option<String>) -> Option<String> {
    key.filter(|k| !k.trim().is_empty())
}

// Response shape for the one-call endpoint. `daily` stays as raw values so a
// single malformed day can be replaced without aborting the whole parse.

#[derive(Debug, Deserialize)]
struct OwOneCall {
    current: OwCurrent,
    daily: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    temp: f64,
    humidity: f64,
    wind_speed: f64,
    wind_deg: Option<i32>,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    icon: String,
    id: i32,
}

#[derive(Debug, Deserialize)]
struct OwDaily {
    temp: OwDailyTemp,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    min: f64,
    max: f64,
}

fn parse_snapshot(
    body: &str,
    selector: &str,
    lang: &'static str,
    metric: bool,
    locality: &dyn LocalityResolver,
) -> Result<WeatherSnapshot, FetchError> {
    let malformed = |reason: String| FetchError::Malformed {
        selector: selector.to_string(),
        lang,
        reason,
    };

    let parsed: OwOneCall =
        serde_json::from_str(body).map_err(|err| malformed(err.to_string()))?;

    let weather = parsed
        .current
        .weather
        .first()
        .ok_or_else(|| malformed("empty weather descriptor list".to_string()))?;

    let forecasts = parse_forecasts(&parsed.daily, metric, weekday_label).map_err(malformed)?;

    let mut wind_speed = parsed.current.wind_speed as f32;
    if metric {
        // speeds are in m/s so convert to our common metric unit km/h
        wind_speed *= 3.6;
    }

    Ok(WeatherSnapshot {
        location_key: selector.to_string(),
        locality: locality
            .locality_for(selector)
            .unwrap_or_else(|| selector.to_string()),
        condition_text: weather.main.clone(),
        condition_code: map_condition(weather.id, &weather.icon),
        temperature: sanitize_temperature(parsed.current.temp, metric),
        humidity: parsed.current.humidity as f32,
        wind_speed,
        wind_direction: parsed.current.wind_deg.unwrap_or(0),
        is_metric: metric,
        forecasts,
        timestamp: Utc::now().timestamp_millis(),
    })
}

/// Clients assume there are always exactly [`FORECAST_DAYS`] entries. A
/// malformed day is replaced by a sentinel and parsing continues; an empty
/// array aborts the whole response instead.
fn parse_forecasts(
    days: &[Value],
    metric: bool,
    label: impl Fn(usize) -> String,
) -> Result<Vec<DayForecast>, String> {
    if days.is_empty() {
        return Err("empty forecasts array".to_string());
    }

    let mut result = Vec::with_capacity(FORECAST_DAYS);
    for (i, raw) in days.iter().take(FORECAST_DAYS).enumerate() {
        match parse_day(raw, label(i), metric) {
            Some(item) => result.push(item),
            None => {
                warn!(day = i, "invalid forecast entry, substituting sentinel");
                result.push(DayForecast::sentinel(metric));
            }
        }
    }
    while result.len() < FORECAST_DAYS {
        warn!(day = result.len(), "missing forecast entry, substituting sentinel");
        result.push(DayForecast::sentinel(metric));
    }

    Ok(result)
}

fn parse_day(raw: &Value, day_label: String, metric: bool) -> Option<DayForecast> {
    let day: OwDaily = serde_json::from_value(raw.clone()).ok()?;
    let cond = day.weather.first()?;

    Some(DayForecast {
        low: sanitize_temperature(day.temp.min, metric),
        high: sanitize_temperature(day.temp.max, metric),
        condition_text: cond.main.clone(),
        condition_code: map_condition(cond.id, &cond.icon),
        day_label,
        is_metric: metric,
    })
}

/// Weekday name for `offset` days from today, starting at today itself.
fn weekday_label(offset: usize) -> String {
    (Local::now() + Duration::days(offset as i64))
        .format("%A")
        .to_string()
}
