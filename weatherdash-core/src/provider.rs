use crate::{
    CurrentConditions, ForecastSeries,
    config::Config,
    error::{Result, WeatherError},
    model::Coordinate,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Best geocoding match for a free-text place name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub name: String,
    pub country: Option<String>,
    pub coordinate: Coordinate,
}

/// The three upstream calls a lookup is built from.
///
/// Implementations make exactly one attempt per call and map failures onto
/// [`WeatherError`]: transport problems to `Network`, non-2xx replies to
/// `Provider`.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Up to `limit` matches for `name`, best first. An empty vec is a
    /// successful "nothing found".
    async fn geocode(&self, name: &str, limit: u8) -> Result<Vec<GeocodeMatch>>;

    async fn current(&self, coord: Coordinate) -> Result<CurrentConditions>;

    async fn forecast(&self, coord: Coordinate) -> Result<ForecastSeries>;

    /// Current conditions looked up by place name in a single request.
    async fn current_by_name(&self, name: &str) -> Result<CurrentConditions>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn WeatherProvider>> {
    let api_key = match &config.api_key {
        Some(key) if config.is_configured() => key,
        _ => return Err(WeatherError::MissingApiKey),
    };

    Ok(Arc::new(OpenWeatherProvider::new(
        api_key.clone(),
        config.endpoints.clone(),
    )))
}

/// Check the configured key with one current-weather request for `city`.
pub async fn verify_api_key(provider: &dyn WeatherProvider, city: &str) -> Result<()> {
    let current = provider.current_by_name(city).await?;
    tracing::info!(
        place = %current.place_name,
        temperature = current.temperature_c,
        "API key verified"
    );
    Ok(())
}
