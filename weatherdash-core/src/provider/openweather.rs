use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::{ApiKey, Endpoints},
    error::{Result, WeatherError},
    model::{Coordinate, CurrentConditions, ForecastEntry, ForecastSeries},
};

use super::{GeocodeMatch, WeatherProvider};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: ApiKey,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: ApiKey, endpoints: Endpoints) -> Self {
        Self::with_client(api_key, endpoints, Client::new())
    }

    pub fn with_client(api_key: ApiKey, endpoints: Endpoints, http: Client) -> Self {
        Self { api_key, endpoints, http }
    }

    /// Issue one GET and decode the JSON body, keeping transport failures,
    /// non-2xx replies and malformed payloads apart.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        tracing::debug!(%url, ?query, "OpenWeather {what} request");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.expose())])
            .send()
            .await
            .map_err(WeatherError::Network)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::Network)?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(status = status.as_u16(), %message, "OpenWeather {what} request failed");
            return Err(WeatherError::Provider { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::Parse(format!("{what}: {e} (body: {})", truncate_body(&body)))
        })
    }

    fn coord_query(coord: Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("lat", coord.latitude.to_string()),
            ("lon", coord.longitude.to_string()),
            ("units", "metric".to_string()),
        ]
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, name: &str, limit: u8) -> Result<Vec<GeocodeMatch>> {
        let url = format!("{}/direct", self.endpoints.geo_base);
        let parsed: Vec<OwGeocode> = self
            .get_json(
                &url,
                &[("q", name.to_string()), ("limit", limit.to_string())],
                "geocoding",
            )
            .await?;

        Ok(parsed.into_iter().map(GeocodeMatch::from).collect())
    }

    async fn current(&self, coord: Coordinate) -> Result<CurrentConditions> {
        let url = format!("{}/weather", self.endpoints.weather_base);
        let parsed: OwCurrentResponse = self
            .get_json(&url, &Self::coord_query(coord), "current weather")
            .await?;

        parsed.try_into()
    }

    async fn forecast(&self, coord: Coordinate) -> Result<ForecastSeries> {
        let url = format!("{}/forecast", self.endpoints.weather_base);
        let parsed: OwForecastResponse = self
            .get_json(&url, &Self::coord_query(coord), "forecast")
            .await?;

        parsed.list.into_iter().map(ForecastEntry::try_from).collect()
    }

    async fn current_by_name(&self, name: &str) -> Result<CurrentConditions> {
        let url = format!("{}/weather", self.endpoints.weather_base);
        let parsed: OwCurrentResponse = self
            .get_json(
                &url,
                &[("q", name.to_string()), ("units", "metric".to_string())],
                "current weather",
            )
            .await?;

        parsed.try_into()
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocode {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: Option<String>,
}

impl From<OwGeocode> for GeocodeMatch {
    fn from(g: OwGeocode) -> Self {
        GeocodeMatch {
            name: g.name,
            country: g.country,
            coordinate: Coordinate::new(g.lat, g.lon),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: i64,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: Option<f64>,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(r: OwCurrentResponse) -> Result<Self> {
        let weather = r.weather.into_iter().next().unwrap_or_default();

        Ok(CurrentConditions {
            place_name: r.name,
            country_code: r.sys.country.unwrap_or_default(),
            observed_at: unix_to_utc(r.dt)?,
            temperature_c: r.main.temp,
            feels_like_c: r.main.feels_like.unwrap_or(r.main.temp),
            humidity_pct: r.main.humidity,
            wind_speed_mps: r.wind.speed,
            visibility_m: r.visibility,
            condition_code: weather.icon,
            condition_text: weather.description,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    pop: Option<f64>,
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = WeatherError;

    fn try_from(e: OwForecastEntry) -> Result<Self> {
        let weather = e.weather.into_iter().next().unwrap_or_default();

        Ok(ForecastEntry {
            timestamp: unix_to_utc(e.dt)?,
            temperature_c: e.main.temp,
            humidity_pct: e.main.humidity,
            wind_speed_mps: e.wind.speed,
            condition_code: weather.icon,
            condition_text: weather.description,
            condition_group: weather.main,
            pop: e.pop,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// OpenWeather error bodies look like `{"cod": 401, "message": "..."}`;
/// `cod` is sometimes a string, so only `message` is read.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| truncate_body(body))
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| WeatherError::Parse(format!("timestamp {ts} is out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
