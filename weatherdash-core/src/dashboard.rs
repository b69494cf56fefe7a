//! One user action from input to render model: resolve, fetch, partition,
//! present.

use chrono::{Local, TimeZone};
use std::{fmt::Display, future::Future, sync::Arc};

use crate::{
    error::{Result, WeatherError},
    fetch::fetch,
    location::{GeolocationOptions, GeolocationSource, resolve_by_geolocation, resolve_by_name},
    model::Coordinate,
    present::{DailyView, HourlyView, daily_views, hourly_title, hourly_views},
    provider::WeatherProvider,
    session::{LookupToken, RenderModel, Session},
};

/// What became of a finished lookup.
#[derive(Debug, Clone)]
pub enum LookupOutcome<Tz: TimeZone> {
    /// The lookup is now the active one.
    Applied(RenderModel<Tz>),
    /// A newer lookup started while this one was in flight; its result,
    /// success or failure, was dropped.
    Superseded,
}

impl<Tz: TimeZone> LookupOutcome<Tz> {
    pub fn into_applied(self) -> Option<RenderModel<Tz>> {
        match self {
            LookupOutcome::Applied(model) => Some(model),
            LookupOutcome::Superseded => None,
        }
    }
}

/// A day's drill-down, read from the active lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyDetail {
    pub title: String,
    pub day: DailyView,
    pub hours: Vec<HourlyView>,
}

#[derive(Debug)]
pub struct Dashboard<Tz: TimeZone = Local> {
    provider: Arc<dyn WeatherProvider>,
    geolocation: Arc<dyn GeolocationSource>,
    options: GeolocationOptions,
    session: Session,
    tz: Tz,
}

impl Dashboard<Local> {
    pub fn new(provider: Arc<dyn WeatherProvider>, geolocation: Arc<dyn GeolocationSource>) -> Self {
        Self::with_time_zone(provider, geolocation, Local)
    }
}

impl<Tz> Dashboard<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Display + Send + Sync,
{
    pub fn with_time_zone(
        provider: Arc<dyn WeatherProvider>,
        geolocation: Arc<dyn GeolocationSource>,
        tz: Tz,
    ) -> Self {
        Self {
            provider,
            geolocation,
            options: GeolocationOptions::default(),
            session: Session::new(),
            tz,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Look up weather for a typed place name.
    ///
    /// Blank input fails with `EmptyInput` and leaves any running lookup alone.
    pub async fn search(&self, name: &str) -> Result<LookupOutcome<Tz>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WeatherError::EmptyInput);
        }

        let token = self.session.begin();
        self.run(token, resolve_by_name(self.provider.as_ref(), name)).await
    }

    /// Look up weather for the device position.
    pub async fn locate(&self) -> Result<LookupOutcome<Tz>> {
        let token = self.session.begin();
        self.run(token, resolve_by_geolocation(self.geolocation.as_ref(), &self.options))
            .await
    }

    /// Try the device position first and fall back to `city` when no position
    /// can be had. Other failures are returned as-is.
    pub async fn locate_or_search(&self, city: &str) -> Result<LookupOutcome<Tz>> {
        match self.locate().await {
            Err(e) if e.is_geolocation() => {
                tracing::warn!(error = %e, %city, "geolocation failed, falling back to city");
                self.search(city).await
            }
            other => other,
        }
    }

    /// Drill into `day` of whatever lookup is active right now.
    pub fn hourly(&self, day: usize) -> Option<HourlyDetail> {
        let active = self.session.active()?;
        let day_view = daily_views(&active.series, &self.tz).into_iter().nth(day)?;

        Some(HourlyDetail {
            title: hourly_title(&day_view),
            hours: hourly_views(&active.series, day, &self.tz),
            day: day_view,
        })
    }

    async fn run<F>(&self, token: LookupToken, resolve: F) -> Result<LookupOutcome<Tz>>
    where
        F: Future<Output = Result<Coordinate>>,
    {
        let result = async {
            let coord = resolve.await?;
            fetch(self.provider.as_ref(), coord).await
        }
        .await;

        if !self.session.is_current(token) {
            tracing::debug!(?token, "dropping superseded lookup");
            return Ok(LookupOutcome::Superseded);
        }

        let lookup = result?;
        match self.session.apply(token, lookup) {
            Some(active) => {
                tracing::info!(
                    place = %active.current.place_name,
                    coord = %active.coordinate,
                    entries = active.series.len(),
                    "lookup applied"
                );
                Ok(LookupOutcome::Applied(RenderModel::new(active, self.tz.clone())))
            }
            None => Ok(LookupOutcome::Superseded),
        }
    }
}
