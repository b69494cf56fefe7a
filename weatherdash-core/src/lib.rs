//! Core library for the `weatherdash` tool.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - Location resolution (device position or place name)
//! - Concurrent fetching of current conditions and the 5-day forecast
//! - Slicing the forecast into daily and hourly views
//! - Display-ready view-models and a session that drops superseded lookups
//!
//! It is used by `weatherdash-cli`, but can also be reused by other front ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod forecast;
pub mod location;
pub mod model;
pub mod present;
pub mod provider;
pub mod session;

pub use config::{ApiKey, Config, Endpoints};
pub use dashboard::{Dashboard, HourlyDetail, LookupOutcome};
pub use error::WeatherError;
pub use model::{Coordinate, CurrentConditions, ForecastEntry, ForecastSeries, Lookup};
pub use present::{CurrentView, DailyView, HourlyView, IconCategory};
pub use provider::{WeatherProvider, provider_from_config, verify_api_key};
pub use session::{RenderModel, Session};
