use serde::Serialize;

/// Clients assume a forecast always carries exactly this many days.
pub const FORECAST_DAYS: usize = 5;

/// One normalized weather observation plus forecast, as exposed to display
/// code. Built once per request and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSnapshot {
    /// The selector the request was made with (free-form query or
    /// coordinate-encoded); stable identity for this snapshot.
    pub location_key: String,
    /// Human-readable place name, resolved outside the parse pipeline.
    pub locality: String,
    pub condition_text: String,
    /// Internal taxonomy code, or -1 when the provider id is unrecognized.
    pub condition_code: i32,
    /// Degrees C or F per `is_metric`; never Kelvin after sanitization.
    pub temperature: f32,
    pub humidity: f32,
    /// km/h when metric; the provider's native m/s value when imperial.
    pub wind_speed: f32,
    /// Degrees, 0 when the provider omits the field.
    pub wind_direction: i32,
    pub is_metric: bool,
    /// Always exactly [`FORECAST_DAYS`] entries, index 0 = earliest.
    pub forecasts: Vec<DayForecast>,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
}

/// One forecast day. May be a sentinel when the source data for that day was
/// missing or malformed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayForecast {
    pub low: f32,
    pub high: f32,
    pub condition_text: String,
    pub condition_code: i32,
    /// Weekday name, or the literal "NaN" for sentinel entries.
    pub day_label: String,
    pub is_metric: bool,
}

impl DayForecast {
    /// Stand-in entry substituted for a missing or malformed day.
    pub fn sentinel(is_metric: bool) -> Self {
        Self {
            low: 0.0,
            high: 0.0,
            condition_text: String::new(),
            condition_code: -1,
            day_label: "NaN".to_string(),
            is_metric,
        }
    }
}
