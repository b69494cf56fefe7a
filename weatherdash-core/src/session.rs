use chrono::TimeZone;
use parking_lot::RwLock;
use std::{
    fmt::Display,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    model::Lookup,
    present::{CurrentView, DailyView, HourlyView, current_view, daily_views, hourly_views},
};

/// Identifies one lookup. Only the newest token may change the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupToken(u64);

/// State shared between lookups: the epoch counter and the lookup currently
/// on screen.
#[derive(Debug, Default)]
pub struct Session {
    epoch: AtomicU64,
    active: RwLock<Option<Arc<Lookup>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup, superseding any that is still in flight.
    pub fn begin(&self) -> LookupToken {
        LookupToken(self.epoch.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: LookupToken) -> bool {
        self.epoch.load(Ordering::SeqCst) == token.0
    }

    /// Replace the active lookup if `token` is still the newest.
    ///
    /// Returns the stored lookup, or `None` when a newer lookup has started
    /// since `token` was issued.
    pub fn apply(&self, token: LookupToken, lookup: Lookup) -> Option<Arc<Lookup>> {
        let mut active = self.active.write();
        if !self.is_current(token) {
            return None;
        }
        let lookup = Arc::new(lookup);
        *active = Some(Arc::clone(&lookup));
        Some(lookup)
    }

    /// The lookup currently on screen.
    pub fn active(&self) -> Option<Arc<Lookup>> {
        self.active.read().clone()
    }
}

/// Everything the front end needs to draw one lookup.
///
/// Holds its own handle on the series, so drill-downs through a model always
/// match the daily cards it was built with.
#[derive(Debug, Clone)]
pub struct RenderModel<Tz: TimeZone> {
    lookup: Arc<Lookup>,
    tz: Tz,
    pub current: CurrentView,
    pub daily: Vec<DailyView>,
}

impl<Tz> RenderModel<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(lookup: Arc<Lookup>, tz: Tz) -> Self {
        let current = current_view(&lookup.current, &tz);
        let daily = daily_views(&lookup.series, &tz);
        Self { lookup, tz, current, daily }
    }

    pub fn hourly(&self, day: usize) -> Vec<HourlyView> {
        hourly_views(&self.lookup.series, day, &self.tz)
    }
}
