use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Observed conditions at the time of the lookup, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub place_name: String,
    pub country_code: String,
    pub observed_at: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    /// Meters. Some stations do not report it.
    pub visibility_m: Option<f64>,
    pub condition_code: String,
    pub condition_text: String,
}

/// One 3-hourly sample from the forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition_code: String,
    pub condition_text: String,
    /// Coarse group such as "Rain" or "Clouds".
    pub condition_group: String,
    /// Probability of precipitation in `[0, 1]`.
    pub pop: Option<f64>,
}

/// Time-ordered forecast samples, 8 per day.
pub type ForecastSeries = Vec<ForecastEntry>;

/// The result of one successful fetch: current conditions plus the series
/// backing the daily and hourly views.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub coordinate: Coordinate,
    pub current: CurrentConditions,
    pub series: ForecastSeries,
}
