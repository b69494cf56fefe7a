//! Display-ready values: icon categories, rounding, and the view-models the
//! front end renders.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;

use crate::{
    forecast::{DailySummary, HourlyEntry, partition_daily, partition_hourly},
    model::{CurrentConditions, ForecastEntry},
};

/// Icon shown for a condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IconCategory {
    /// Clear sky, also the fallback for unknown codes.
    #[default]
    Sun,
    Moon,
    CloudSun,
    CloudMoon,
    Cloud,
    CloudRain,
    CloudSunRain,
    CloudMoonRain,
    Bolt,
    Snow,
    Smog,
}

impl IconCategory {
    /// Map an OpenWeather icon code ("01d" .. "50n"). Never fails.
    pub fn for_code(code: &str) -> Self {
        match code {
            "01d" => Self::Sun,
            "01n" => Self::Moon,
            "02d" => Self::CloudSun,
            "02n" => Self::CloudMoon,
            "03d" | "03n" | "04d" | "04n" => Self::Cloud,
            "09d" | "09n" => Self::CloudRain,
            "10d" => Self::CloudSunRain,
            "10n" => Self::CloudMoonRain,
            "11d" | "11n" => Self::Bolt,
            "13d" | "13n" => Self::Snow,
            "50d" | "50n" => Self::Smog,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::CloudSun => "cloud-sun",
            Self::CloudMoon => "cloud-moon",
            Self::Cloud => "cloud",
            Self::CloudRain => "cloud-rain",
            Self::CloudSunRain => "cloud-sun-rain",
            Self::CloudMoonRain => "cloud-moon-rain",
            Self::Bolt => "bolt",
            Self::Snow => "snow",
            Self::Smog => "smog",
        }
    }
}

impl Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a condition text describes falling water.
pub fn is_precipitating(condition_text: &str) -> bool {
    let lower = condition_text.to_lowercase();
    ["rain", "drizzle", "thunderstorm"].iter().any(|w| lower.contains(w))
}

/// Probability of precipitation as a whole percentage; 0 when not reported.
pub fn precipitation_percent(pop: Option<f64>) -> u8 {
    pop.map(|p| (p * 100.0).round().clamp(0.0, 100.0) as u8).unwrap_or(0)
}

/// Round half away from zero to a whole unit.
pub fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", round_whole(celsius))
}

pub fn format_wind(mps: f64) -> String {
    format!("{} m/s", round_whole(mps))
}

/// Meters to kilometers, one decimal place.
pub fn format_visibility(meters: Option<f64>) -> String {
    match meters {
        Some(m) => format!("{:.1} km", m / 1000.0),
        None => "n/a".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    /// "Paris, FR"
    pub place: String,
    /// "Friday, October 16, 2026"
    pub date: String,
    pub temperature_c: i64,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub visibility: String,
    pub icon: IconCategory,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyView {
    pub day_index: usize,
    pub label: String,
    /// "Oct 16"
    pub date: String,
    pub icon: IconCategory,
    pub temperature_c: i64,
    pub temperature: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyView {
    pub timestamp: DateTime<Utc>,
    /// "3:00 PM"
    pub time: String,
    pub icon: IconCategory,
    pub temperature_c: i64,
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind: String,
    pub precipitation: String,
    pub is_precipitating: bool,
}

pub fn current_view<Tz>(current: &CurrentConditions, tz: &Tz) -> CurrentView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let place = if current.country_code.is_empty() {
        current.place_name.clone()
    } else {
        format!("{}, {}", current.place_name, current.country_code)
    };

    CurrentView {
        place,
        date: current.observed_at.with_timezone(tz).format("%A, %B %-d, %Y").to_string(),
        temperature_c: round_whole(current.temperature_c),
        temperature: format_temperature(current.temperature_c),
        feels_like: format_temperature(current.feels_like_c),
        humidity: format!("{}%", current.humidity_pct),
        wind: format_wind(current.wind_speed_mps),
        visibility: format_visibility(current.visibility_m),
        icon: IconCategory::for_code(&current.condition_code),
        description: current.condition_text.clone(),
    }
}

fn daily_view<Tz>(summary: &DailySummary<'_>, tz: &Tz) -> DailyView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let entry = summary.entry;
    DailyView {
        day_index: summary.day_index,
        label: summary.label.clone(),
        date: short_date(entry, tz),
        icon: IconCategory::for_code(&entry.condition_code),
        temperature_c: round_whole(entry.temperature_c),
        temperature: format_temperature(entry.temperature_c),
        description: entry.condition_text.clone(),
    }
}

fn hourly_view<Tz>(hour: &HourlyEntry<'_>, tz: &Tz) -> HourlyView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let entry = hour.entry;
    HourlyView {
        timestamp: entry.timestamp,
        time: entry.timestamp.with_timezone(tz).format("%-I:%M %p").to_string(),
        icon: IconCategory::for_code(&entry.condition_code),
        temperature_c: round_whole(entry.temperature_c),
        temperature: format_temperature(entry.temperature_c),
        description: entry.condition_text.clone(),
        humidity: format!("{}%", entry.humidity_pct),
        wind: format_wind(entry.wind_speed_mps),
        precipitation: format!("{}%", hour.precipitation_percent),
        is_precipitating: hour.is_precipitating,
    }
}

pub fn daily_views<Tz>(series: &[ForecastEntry], tz: &Tz) -> Vec<DailyView>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    partition_daily(series, tz).iter().map(|d| daily_view(d, tz)).collect()
}

pub fn hourly_views<Tz>(series: &[ForecastEntry], day: usize, tz: &Tz) -> Vec<HourlyView>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    partition_hourly(series, day).iter().map(|h| hourly_view(h, tz)).collect()
}

/// "Hourly Weather - Today, Oct 16"
pub fn hourly_title(day: &DailyView) -> String {
    format!("Hourly Weather - {}, {}", day.label, day.date)
}

fn short_date<Tz>(entry: &ForecastEntry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    entry.timestamp.with_timezone(tz).format("%b %-d").to_string()
}
