//! Slicing the flat 3-hourly series into daily and hourly views.
//!
//! Days are found by index stride, not by timestamp: the provider emits one
//! entry every 3 hours, so every block of [`ENTRIES_PER_DAY`] entries is one
//! day. A provider with a different cadence would produce mislabeled days.

use chrono::TimeZone;
use std::fmt::Display;

use crate::{
    model::ForecastEntry,
    present::{is_precipitating, precipitation_percent},
};

pub const ENTRIES_PER_DAY: usize = 8;
pub const MAX_DAYS: usize = 5;

/// The representative entry of one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary<'a> {
    pub day_index: usize,
    /// "Today" for the first day, weekday name otherwise.
    pub label: String,
    pub entry: &'a ForecastEntry,
}

/// One entry of a day's hourly bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEntry<'a> {
    pub entry: &'a ForecastEntry,
    /// Read from the condition group (`Rain`, `Snow`, ...), not the
    /// description, so "light rain and snow" under `Snow` is `false`. The
    /// description is only used when the group is empty.
    pub is_precipitating: bool,
    pub precipitation_percent: u8,
}

impl<'a> HourlyEntry<'a> {
    fn new(entry: &'a ForecastEntry) -> Self {
        let text = if entry.condition_group.is_empty() {
            &entry.condition_text
        } else {
            &entry.condition_group
        };
        Self {
            entry,
            is_precipitating: is_precipitating(text),
            precipitation_percent: precipitation_percent(entry.pop),
        }
    }
}

/// Number of whole days covered by a series of `len` entries, capped at [`MAX_DAYS`].
pub fn day_count(len: usize) -> usize {
    (len / ENTRIES_PER_DAY).min(MAX_DAYS)
}

/// First entry of each full 8-entry block, at most five, labeled in `tz`.
pub fn partition_daily<'a, Tz>(series: &'a [ForecastEntry], tz: &Tz) -> Vec<DailySummary<'a>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    series
        .chunks_exact(ENTRIES_PER_DAY)
        .take(day_count(series.len()))
        .enumerate()
        .map(|(day_index, block)| {
            let entry = &block[0];
            DailySummary { day_index, label: day_label(day_index, entry, tz), entry }
        })
        .collect()
}

/// Entries `[8 * day, 8 * day + 8)`, clipped to the series. Missing entries
/// are not filled in.
pub fn partition_hourly(series: &[ForecastEntry], day: usize) -> Vec<HourlyEntry<'_>> {
    let Some(start) = day.checked_mul(ENTRIES_PER_DAY).filter(|s| *s < series.len()) else {
        return Vec::new();
    };
    let end = (start + ENTRIES_PER_DAY).min(series.len());

    series[start..end].iter().map(HourlyEntry::new).collect()
}

fn day_label<Tz>(day_index: usize, entry: &ForecastEntry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if day_index == 0 {
        "Today".to_string()
    } else {
        entry.timestamp.with_timezone(tz).format("%A").to_string()
    }
}
