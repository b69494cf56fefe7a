use crate::{
    error::Result,
    model::{Coordinate, Lookup},
    provider::WeatherProvider,
};

/// Fetch current conditions and the forecast series for `coord`.
///
/// Both requests run concurrently. The first failure aborts the lookup and
/// the other request is dropped; nothing is retried.
pub async fn fetch(provider: &dyn WeatherProvider, coord: Coordinate) -> Result<Lookup> {
    let (current, series) = tokio::try_join!(provider.current(coord), provider.forecast(coord))?;

    tracing::debug!(
        place = %current.place_name,
        entries = series.len(),
        "fetched weather"
    );

    Ok(Lookup { coordinate: coord, current, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::WeatherError,
        model::{CurrentConditions, ForecastSeries},
        provider::GeocodeMatch,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;

    #[derive(Debug)]
    struct Scripted {
        forecast_fails: bool,
        current_delay: Duration,
    }

    fn conditions() -> CurrentConditions {
        CurrentConditions {
            place_name: "Paris".into(),
            country_code: "FR".into(),
            observed_at: Utc::now(),
            temperature_c: 15.2,
            feels_like_c: 14.0,
            humidity_pct: 70,
            wind_speed_mps: 3.0,
            visibility_m: Some(10_000.0),
            condition_code: "04d".into(),
            condition_text: "overcast clouds".into(),
        }
    }

    #[async_trait]
    impl crate::provider::WeatherProvider for Scripted {
        async fn geocode(&self, _: &str, _: u8) -> Result<Vec<GeocodeMatch>> {
            Ok(Vec::new())
        }

        async fn current(&self, _: Coordinate) -> Result<CurrentConditions> {
            tokio::time::sleep(self.current_delay).await;
            Ok(conditions())
        }

        async fn forecast(&self, _: Coordinate) -> Result<ForecastSeries> {
            if self.forecast_fails {
                Err(WeatherError::Provider { status: 500, message: "boom".into() })
            } else {
                Ok(Vec::new())
            }
        }

        async fn current_by_name(&self, _: &str) -> Result<CurrentConditions> {
            Ok(conditions())
        }
    }

    #[tokio::test]
    async fn both_succeed() {
        let provider = Scripted { forecast_fails: false, current_delay: Duration::ZERO };
        let lookup = fetch(&provider, Coordinate::new(48.86, 2.35)).await.expect("lookup");

        assert_eq!(lookup.current.place_name, "Paris");
        assert!(lookup.series.is_empty());
        assert_eq!(lookup.coordinate, Coordinate::new(48.86, 2.35));
    }

    #[tokio::test(start_paused = true)]
    async fn forecast_failure_fails_the_lookup_without_waiting_for_current() {
        let provider = Scripted { forecast_fails: true, current_delay: Duration::from_secs(3600) };
        let started = tokio::time::Instant::now();

        let err = fetch(&provider, Coordinate::new(0.0, 0.0)).await.unwrap_err();

        assert!(matches!(err, WeatherError::Provider { status: 500, .. }));
        assert!(started.elapsed() < Duration::from_secs(3600));
    }
}
