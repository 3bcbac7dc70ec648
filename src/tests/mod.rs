//! # Controller Scenario Tests
//!
//! End-to-end runs of the controller against fakes. Buttons are scripted: each
//! press fires once the last committed frame shows the expected text, and the
//! manual clock makes the 100 ms ticks free, so a ten-minute board refresh runs
//! in microseconds.


use crate::api::{RawArrival, WeatherReport};
use crate::config::StationConfig;
use crate::controller::{Collaborators, Controller, Settings};
use crate::input::Buttons;
use crate::testing::{FakeNetwork, FakeTransit, FakeWeather, Frames, ManualClock, RecordingDisplay, Script};
use crate::Direction;
use std::time::Duration;

/// Fakes shared between the test and the controller under test.
pub(crate) struct Harness {
    pub clock: ManualClock,
    pub transit: FakeTransit,
    pub weather: FakeWeather,
    pub network: FakeNetwork,
    pub frames: Frames,
    pub script: Script,
}

impl Harness {
    pub fn new() -> Self {
        let frames = Frames::default();
        Self {
            clock: ManualClock::new(),
            transit: FakeTransit::new(),
            weather: FakeWeather::new(WeatherReport {
                description: "light rain".to_string(),
                temperature_celsius: 12.3,
            }),
            network: FakeNetwork::connected(),
            script: Script::new(&frames),
            frames,
        }
    }

    pub fn settings(stations: Vec<StationConfig>) -> Settings {
        Settings {
            ssid: "home".to_string(),
            password: "secret".to_string(),
            connect_timeout: Duration::from_secs(30),
            sync_attempts: 2,
            status_lines: vec![
                "hammersmith-city".to_string(),
                "circle".to_string(),
                "central".to_string(),
            ],
            status_titles: vec!["H&C".to_string(), "Circle".to_string(), "Central".to_string()],
            stations,
            weather_interval: chrono::Duration::seconds(600),
        }
    }

    pub fn controller(&self, settings: Settings) -> Controller {
        self.controller_with_buttons(settings, self.script.buttons())
    }

    /// Controller reading `buttons` instead of the script.
    pub fn controller_with_buttons(&self, settings: Settings, buttons: Buttons) -> Controller {
        Controller::new(
            Collaborators {
                display: Box::new(RecordingDisplay::new(&self.frames)),
                buttons,
                clock: Box::new(self.clock.clone()),
                network: Box::new(self.network.clone()),
                transit: Box::new(self.transit.clone()),
                weather: Box::new(self.weather.clone()),
            },
            settings,
        )
    }
}

pub(crate) fn station(
    title: &str,
    lines: &[&str],
    line_titles: &[&str],
    direction: Direction,
) -> StationConfig {
    StationConfig {
        title: title.to_string(),
        lines: lines.iter().map(|s| s.to_string()).collect(),
        line_titles: line_titles.iter().map(|s| s.to_string()).collect(),
        station_id: "940GZZLUWLA".to_string(),
        direction,
    }
}

pub(crate) fn raw(platform: &str, seconds: u32, towards: &str) -> RawArrival {
    RawArrival {
        platform_name: platform.to_string(),
        time_to_station: seconds,
        towards: towards.to_string(),
    }
}

/// True when `row` of the frame reads exactly `text`.
pub(crate) fn row_is(frame: &[String], row: usize, text: &str) -> bool {
    frame.get(row).is_some_and(|r| r == text)
}

/// True when `row` of the frame begins with `prefix`.
pub(crate) fn row_starts(frame: &[String], row: usize, prefix: &str) -> bool {
    frame.get(row).is_some_and(|r| r.starts_with(prefix))
}
