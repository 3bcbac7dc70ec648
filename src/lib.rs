//! # Tube Board Core Library
//!
//! This library drives a small two-button device with a 128x64 monochrome display
//! that shows live transit line status, station departures, the weather and the
//! time. Everything runs on one thread: the controller polls the buttons every
//! 100 ms tick and performs blocking network fetches in between.
//!
//! ## Design Philosophy
//!
//! ### Cooperative Scheduling
//! - **One suspension point**: every screen waits through [`input::Buttons::wait_until`],
//!   which samples both buttons each tick and is also the only way to cancel a screen
//! - **Tick-derived time**: refresh cadence is counted in ticks, so it drifts under
//!   fetch latency; wall-clock time is only used for display and cache expiry
//! - **Blocking fetches**: status, arrival and weather requests stall the loop until
//!   they complete
//!
//! ### Collaborators Behind Traits
//! WiFi association, clock sync, the HTTP wrappers, the display surface and the
//! buttons are all traits, so the controller can be exercised with fakes and a
//! manual clock.
//!
//! ### Data Flow
//! 1. **Tick**: sample buttons → screen handler
//! 2. **Fetch**: transit aggregator / weather cache
//! 3. **Render**: renderer → text rows → display commit
//!
//! ## Core Types
//!
//! - [`LineStatus`]: normalized service status of one line
//! - [`Arrival`]: one merged arrival prediction
//! - [`Direction`]: platform filter for a departure board

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Module declarations
pub mod api;
pub mod clock;
pub mod config;
pub mod controller;
pub mod display;
#[cfg(all(target_os = "linux", feature = "hardware"))]
pub mod gpio;
pub mod input;
pub mod network;
pub mod ntp;
pub mod recovery;
pub mod renderer;
pub mod transit;
pub mod weather;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

/// Raw status text the transit API reports for a line running normally.
pub const GOOD_SERVICE: &str = "Good Service";

/// How a [`LineStatus`] is turned into display text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusMode {
    /// `Good` for normal service, raw text otherwise
    Short,
    /// Raw text always
    Long,
}

/// Service status of a single line.
///
/// # Example
/// ```
/// use tube_board_lib::{LineStatus, StatusMode};
///
/// let status = LineStatus::from_raw("Good Service");
/// assert_eq!(status.render(StatusMode::Short), "Good");
///
/// let delayed = LineStatus::from_raw("Minor Delays");
/// assert_eq!(delayed.render(StatusMode::Short), "Minor Delays");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineStatus {
    /// The API reported exactly `"Good Service"`
    Good,
    /// Any other description, kept verbatim
    Other(String),
}

impl LineStatus {
    /// Map the API's status description onto a variant.
    pub fn from_raw(raw: &str) -> Self {
        if raw == GOOD_SERVICE {
            LineStatus::Good
        } else {
            LineStatus::Other(raw.to_string())
        }
    }

    pub fn render(&self, mode: StatusMode) -> Cow<'_, str> {
        match (self, mode) {
            (LineStatus::Good, StatusMode::Short) => Cow::Borrowed("Good"),
            (LineStatus::Good, StatusMode::Long) => Cow::Borrowed(GOOD_SERVICE),
            (LineStatus::Other(text), _) => Cow::Borrowed(text.as_str()),
        }
    }
}

/// One predicted arrival at a station platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    /// Platform label (last word of the platform name, e.g. `"1"`)
    pub platform: String,
    /// Seconds until the train reaches the platform
    pub seconds_to_arrival: u32,
    /// Destination the train is heading towards
    pub destination: String,
}

impl Arrival {
    /// Whole minutes to arrival, rounded down.
    pub fn minutes(&self) -> u32 {
        self.seconds_to_arrival / 60
    }
}

/// Which platforms a departure board shows.
///
/// Deserializes from `"all"` or from the first word of the platform names to
/// keep, such as `"Westbound"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    All,
    Towards(String),
}

impl Direction {
    /// Whether an arrival at `platform_name` passes this filter.
    ///
    /// Only the first word of the platform name is compared. A platform name
    /// without any separator never matches a direction prefix.
    pub fn matches(&self, platform_name: &str) -> bool {
        match self {
            Direction::All => true,
            Direction::Towards(prefix) => {
                let mut words = platform_name.split_whitespace();
                match (words.next(), words.next()) {
                    (Some(first), Some(_)) => first == prefix,
                    _ => false,
                }
            }
        }
    }
}

impl From<String> for Direction {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("all") {
            Direction::All
        } else {
            Direction::Towards(value)
        }
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        match value {
            Direction::All => "all".to_string(),
            Direction::Towards(prefix) => prefix,
        }
    }
}
