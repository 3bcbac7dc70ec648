//! # Weather Cache
//!
//! Keeps the last weather report and only hits the network once it is older
//! than the update interval (10 minutes by default). Display refreshes are far
//! more frequent than that, so the cache decouples the two cadences.
//!
//! ## Caching Strategy
//! - **Lazy**: nothing is fetched until the first read
//! - **Single fetch per window**: [`WeatherCache::current`] refreshes at most once and
//!   hands back the whole snapshot, so description and temperature come from
//!   the same fetch
//! - **Injectable clock**: staleness is judged against [`Clock::now`]
//!
//! A fetch that fails with an HTTP status or an unreadable body still produces
//! a snapshot (`"HTTP <code>"` / `"Error"` with an unknown temperature) and
//! still starts a new window, so a broken service is not polled every tick.

use crate::api::{openweather::MISSING_DESCRIPTION, ApiError, WeatherApi};
use crate::clock::Clock;
use chrono::{DateTime, Duration, FixedOffset};
use log::{debug, warn};

/// Default time-to-live of a snapshot in seconds (10 minutes)
pub const UPDATE_INTERVAL_SECS: i64 = 600;

/// Last fetched weather.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherSnapshot {
    pub description: String,
    /// NaN when the service did not report a temperature
    pub temperature_celsius: f64,
    pub fetched_at: DateTime<FixedOffset>,
}

pub struct WeatherCache {
    update_interval: Duration,
    snapshot: Option<WeatherSnapshot>,
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(Duration::seconds(UPDATE_INTERVAL_SECS))
    }
}

impl WeatherCache {
    pub fn new(update_interval: Duration) -> Self {
        Self {
            update_interval,
            snapshot: None,
        }
    }

    /// Whether the next read would trigger a fetch.
    pub fn is_stale(&self, now: DateTime<FixedOffset>) -> bool {
        match &self.snapshot {
            Some(snapshot) => now - snapshot.fetched_at > self.update_interval,
            None => true,
        }
    }

    /// Return the cached snapshot, fetching first if it is missing or stale.
    pub fn current(
        &mut self,
        api: &mut dyn WeatherApi,
        clock: &dyn Clock,
    ) -> Result<&WeatherSnapshot, ApiError> {
        let now = clock.now();
        if self.is_stale(now) {
            let snapshot = fetch_snapshot(api, now)?;
            debug!(
                "Weather updated: {} {:.1}C",
                snapshot.description, snapshot.temperature_celsius
            );
            self.snapshot = Some(snapshot);
        }
        self.snapshot
            .as_ref()
            .ok_or_else(|| ApiError::Decode("weather snapshot missing".to_string()))
    }

    pub fn description(
        &mut self,
        api: &mut dyn WeatherApi,
        clock: &dyn Clock,
    ) -> Result<String, ApiError> {
        Ok(self.current(api, clock)?.description.clone())
    }

    pub fn temperature(
        &mut self,
        api: &mut dyn WeatherApi,
        clock: &dyn Clock,
    ) -> Result<f64, ApiError> {
        Ok(self.current(api, clock)?.temperature_celsius)
    }
}

fn fetch_snapshot(
    api: &mut dyn WeatherApi,
    now: DateTime<FixedOffset>,
) -> Result<WeatherSnapshot, ApiError> {
    let (description, temperature_celsius) = match api.fetch() {
        Ok(report) => (report.description, report.temperature_celsius),
        Err(ApiError::Status(code)) => {
            warn!("Weather fetch answered HTTP {}", code);
            (format!("HTTP {}", code), f64::NAN)
        }
        Err(ApiError::Decode(reason)) => {
            warn!("Weather response unreadable: {}", reason);
            (MISSING_DESCRIPTION.to_string(), f64::NAN)
        }
        Err(e) => return Err(e),
    };
    Ok(WeatherSnapshot {
        description,
        temperature_celsius,
        fetched_at: now,
    })
}
