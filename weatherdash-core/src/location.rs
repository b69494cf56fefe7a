//! Turning a device position or a free-text place name into coordinates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{fmt::Debug, time::Duration};

use crate::{
    config::PositionConfig,
    error::{Result, WeatherError},
    model::Coordinate,
    provider::WeatherProvider,
};

/// How a position is requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the caller is willing to accept.
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5 * 60),
        }
    }
}

/// A platform location service.
///
/// Implementations fail with one of the `Geolocation*` variants. Timeouts are
/// enforced by [`resolve_by_geolocation`], not by the source.
#[async_trait]
pub trait GeolocationSource: Send + Sync + Debug {
    async fn current_position(&self, options: &GeolocationOptions) -> Result<Coordinate>;
}

/// No location service on this platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl GeolocationSource for Unavailable {
    async fn current_position(&self, _options: &GeolocationOptions) -> Result<Coordinate> {
        Err(WeatherError::GeolocationUnavailable)
    }
}

/// A stored fix, e.g. from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPosition {
    pub coordinate: Coordinate,
    pub captured_at: Option<DateTime<Utc>>,
}

impl FixedPosition {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate, captured_at: None }
    }

    fn is_fresh(&self, maximum_age: Duration, now: DateTime<Utc>) -> bool {
        let Some(captured_at) = self.captured_at else {
            return true;
        };
        match (now - captured_at).to_std() {
            Ok(age) => age <= maximum_age,
            // Captured "in the future": clock skew, accept it.
            Err(_) => true,
        }
    }
}

impl From<&PositionConfig> for FixedPosition {
    fn from(p: &PositionConfig) -> Self {
        Self { coordinate: p.coordinate(), captured_at: p.captured_at }
    }
}

#[async_trait]
impl GeolocationSource for FixedPosition {
    async fn current_position(&self, options: &GeolocationOptions) -> Result<Coordinate> {
        if self.is_fresh(options.maximum_age, Utc::now()) {
            Ok(self.coordinate)
        } else {
            tracing::debug!(captured_at = ?self.captured_at, "stored position is too old");
            Err(WeatherError::GeolocationUnavailable)
        }
    }
}

/// Ask `source` for the device position, waiting at most `options.timeout`.
pub async fn resolve_by_geolocation(
    source: &dyn GeolocationSource,
    options: &GeolocationOptions,
) -> Result<Coordinate> {
    match tokio::time::timeout(options.timeout, source.current_position(options)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout = ?options.timeout, "geolocation timed out");
            Err(WeatherError::GeolocationTimeout)
        }
    }
}

/// Geocode `name` to the single best match.
///
/// Whitespace-only input is rejected before any request goes out.
pub async fn resolve_by_name(provider: &dyn WeatherProvider, name: &str) -> Result<Coordinate> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WeatherError::EmptyInput);
    }

    tracing::debug!(%name, "geocoding");
    let best = provider
        .geocode(name, 1)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::NotFound { query: name.to_string() })?;

    tracing::debug!(
        place = %best.name,
        country = ?best.country,
        coord = %best.coordinate,
        "geocoded"
    );
    Ok(best.coordinate)
}
