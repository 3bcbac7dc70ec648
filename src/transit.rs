//! # Transit Status Aggregation
//!
//! Stateless helpers on top of [`TransitApi`]: fetch the status of several
//! lines, and merge arrival predictions of every line serving one station.
//!
//! ## Merge Rules
//! 1. **Filter**: keep arrivals whose platform name passes the [`Direction`] filter
//! 2. **Label**: the platform label is the last word of the platform name
//! 3. **Concatenate**: results of each line are appended in line order
//! 4. **Sort**: one stable sort by seconds to arrival over the merged list, so
//!    equal times keep their concatenation order

use crate::api::{ApiError, RawArrival, TransitApi};
use crate::{Arrival, Direction, LineStatus};
use log::debug;

/// Status of every line in `lines`, aligned by index.
///
/// A non-success HTTP status for one line becomes that line's status text
/// (`"HTTP 503"`) instead of failing the whole board. Transport errors propagate.
pub fn line_statuses<L: AsRef<str>>(
    api: &mut dyn TransitApi,
    lines: &[L],
) -> Result<Vec<LineStatus>, ApiError> {
    lines
        .iter()
        .map(|line| match api.fetch_status(line.as_ref()) {
            Ok(raw) => Ok(LineStatus::from_raw(&raw)),
            Err(ApiError::Status(code)) => Ok(LineStatus::Other(format!("HTTP {}", code))),
            Err(e) => Err(e),
        })
        .collect()
}

/// Arrivals of all `lines` at `station_id`, filtered by `direction` and sorted.
pub fn arrival_predict<L: AsRef<str>>(
    api: &mut dyn TransitApi,
    lines: &[L],
    station_id: &str,
    direction: &Direction,
) -> Result<Vec<Arrival>, ApiError> {
    let mut merged = Vec::new();
    for line in lines {
        let raw = api.fetch_arrivals(line.as_ref(), station_id)?;
        debug!(
            "{} arrivals for {} at {}",
            raw.len(),
            line.as_ref(),
            station_id
        );
        merged.extend(filter_arrivals(raw, direction));
    }
    sort_arrivals(&mut merged);
    Ok(merged)
}

/// Keep arrivals matching `direction`, converting them to display form.
pub fn filter_arrivals(raw: Vec<RawArrival>, direction: &Direction) -> Vec<Arrival> {
    raw.into_iter()
        .filter(|arrival| direction.matches(&arrival.platform_name))
        .map(|arrival| Arrival {
            platform: platform_label(&arrival.platform_name).to_string(),
            seconds_to_arrival: arrival.time_to_station,
            destination: arrival.towards,
        })
        .collect()
}

/// Stable ascending sort by seconds to arrival.
pub fn sort_arrivals(arrivals: &mut [Arrival]) {
    arrivals.sort_by_key(|arrival| arrival.seconds_to_arrival);
}

/// Last word of a platform name (`"Westbound - Platform 1"` → `"1"`).
pub fn platform_label(platform_name: &str) -> &str {
    platform_name.split_whitespace().last().unwrap_or("")
}

/// True when every arrival in the batch uses the same platform.
///
/// An empty batch counts as homogeneous.
pub fn same_platform(arrivals: &[Arrival]) -> bool {
    match arrivals.first() {
        Some(first) => arrivals.iter().all(|a| a.platform == first.platform),
        None => true,
    }
}
