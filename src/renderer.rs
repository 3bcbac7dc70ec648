//! # Screen Rendering
//!
//! This module turns board data into display rows. Label helpers are pure
//! functions of their inputs; the `render_*` functions write to a
//! [`TextDisplay`] and commit with `show()`.
//!
//! ## Row Layout (5-row panel)
//! ```text
//! row 0   header: title, weather, or carousel line status
//! row 1-3 content: line statuses / departures / system info
//! row 4   footer: clock (line board) or last departure
//! ```
//! Boards size themselves from `num_rows()`, so a taller surface shows more
//! departures.

use crate::api::Probe;
use crate::display::{DisplayError, TextDisplay};
use crate::weather::WeatherSnapshot;
use crate::{Arrival, LineStatus, StatusMode};
use chrono::{DateTime, FixedOffset};

pub const MENU_TITLE: &str = "Main menu";
pub const LOADING: &str = "Loading...";
pub const UPDATING: &str = "Updating...";
pub const NO_DEPARTURES: &str = "No departures";

/// Menu rows 1-4 for `choice`: previous entry, marked current entry, then the
/// next two, all wrapping around.
pub fn menu_rows<S: AsRef<str>>(labels: &[S], choice: usize) -> [String; 4] {
    let n = labels.len();
    if n == 0 {
        return Default::default();
    }
    let at = |offset: usize| labels[(choice + offset) % n].as_ref().to_string();
    [
        at(n - 1),
        format!("x {}", labels[choice % n].as_ref()),
        at(1),
        at(2),
    ]
}

/// Draw the main menu. A partial redraw leaves the title row alone.
pub fn render_menu<S: AsRef<str>>(
    display: &mut dyn TextDisplay,
    labels: &[S],
    choice: usize,
    partial: bool,
) -> Result<(), DisplayError> {
    if !partial {
        display.clear_row(0)?;
        display.text(0, MENU_TITLE)?;
    }
    let rows = display.num_rows();
    for (i, label) in menu_rows(labels, choice).iter().enumerate() {
        let row = i + 1;
        if row < rows {
            display.clear_row(row)?;
            display.text(row, label)?;
        }
    }
    display.show()
}

/// `HH:MM`
pub fn clock_label(now: DateTime<FixedOffset>) -> String {
    now.format("%H:%M").to_string()
}

/// `YYYY-MM-DD HH:MM`
pub fn date_time_label(now: DateTime<FixedOffset>) -> String {
    now.format("%Y-%m-%d %H:%M").to_string()
}

/// Whole degrees followed by `"C`; `--"C` when unknown.
pub fn temperature_label(celsius: f64) -> String {
    if !celsius.is_finite() {
        return "--\"C".to_string();
    }
    // values that would print as "-0"
    let celsius = if celsius.abs() <= 0.5 { 0.0 } else { celsius };
    format!("{:.0}\"C", celsius)
}

/// Minutes to arrival, platform-qualified unless the batch shares a platform.
pub fn eta_label(arrival: &Arrival, same_platform: bool) -> String {
    if same_platform {
        arrival.minutes().to_string()
    } else {
        format!("Pl.{} {}", arrival.platform, arrival.minutes())
    }
}

/// `"TFL API OK"` or `"TFL API: 503"`
pub fn probe_label(service: &str, probe: Probe) -> String {
    match probe {
        Probe::Ok => format!("{} OK", service),
        Probe::Status(code) => format!("{}: {}", service, code),
    }
}

/// Replace one row and commit.
pub fn render_row(
    display: &mut dyn TextDisplay,
    row: usize,
    text: &str,
) -> Result<(), DisplayError> {
    display.clear_row(row)?;
    display.text(row, text)?;
    display.show()
}

/// Replace one row with a two-sided text and commit.
pub fn render_row_both_sides(
    display: &mut dyn TextDisplay,
    row: usize,
    left: &str,
    right: &str,
) -> Result<(), DisplayError> {
    display.clear_row(row)?;
    display.text_both_sides(row, left, right)?;
    display.show()
}

/// Clear everything, write `text` on row 0 and commit.
pub fn render_title(display: &mut dyn TextDisplay, text: &str) -> Result<(), DisplayError> {
    display.clear()?;
    display.text(0, text)?;
    display.show()
}

/// Bottom row: optional note on the left, clock on the right.
pub fn render_clock_row(
    display: &mut dyn TextDisplay,
    note: &str,
    now: DateTime<FixedOffset>,
) -> Result<(), DisplayError> {
    let last = display.num_rows().saturating_sub(1);
    render_row_both_sides(display, last, note, &clock_label(now))
}

/// Full line status board: weather header, one row per line, clock footer.
pub fn render_line_board<T: AsRef<str>>(
    display: &mut dyn TextDisplay,
    weather: &WeatherSnapshot,
    titles: &[T],
    statuses: &[LineStatus],
    now: DateTime<FixedOffset>,
) -> Result<(), DisplayError> {
    display.clear()?;
    display.text_both_sides(
        0,
        &weather.description,
        &temperature_label(weather.temperature_celsius),
    )?;
    for (i, (title, status)) in titles.iter().zip(statuses).enumerate() {
        display.text_both_sides(i + 1, title.as_ref(), &status.render(StatusMode::Short))?;
    }
    let last = display.num_rows().saturating_sub(1);
    display.text_both_sides(last, "", &clock_label(now))?;
    display.show()
}

/// Full departure board: station title, then as many arrivals as fit.
pub fn render_departures(
    display: &mut dyn TextDisplay,
    title: &str,
    arrivals: &[Arrival],
    same_platform: bool,
) -> Result<(), DisplayError> {
    display.clear()?;
    display.text(0, title)?;
    if arrivals.is_empty() {
        display.text(1, NO_DEPARTURES)?;
    }
    let slots = display.num_rows().saturating_sub(1);
    for (i, arrival) in arrivals.iter().take(slots).enumerate() {
        display.text_both_sides(i + 1, &arrival.destination, &eta_label(arrival, same_platform))?;
    }
    display.show()
}

/// Departure board whose arrival fetch answered with an HTTP error.
pub fn render_departures_failed(
    display: &mut dyn TextDisplay,
    title: &str,
    code: u16,
) -> Result<(), DisplayError> {
    display.clear()?;
    display.text(0, title)?;
    display.text(1, &format!("HTTP {}", code))?;
    display.show()
}

/// What the system info screen shows.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemInfo {
    /// Hardware id without separators
    pub mac: String,
    pub ip: String,
    pub transit: Probe,
    pub weather: Probe,
    pub now: DateTime<FixedOffset>,
}

pub fn render_system_info(
    display: &mut dyn TextDisplay,
    info: &SystemInfo,
) -> Result<(), DisplayError> {
    display.clear()?;
    display.text(0, &format!("mac:{}", info.mac))?;
    display.text(1, &info.ip)?;
    display.text(2, &probe_label("TFL API", info.transit))?;
    display.text(3, &probe_label("Weather API", info.weather))?;
    display.text(4, &date_time_label(info.now))?;
    display.show()
}
