//! # UI Controller
//!
//! Owns the screen, the buttons and every collaborator, and runs the screen
//! state machine:
//!
//! ```text
//! MainMenu ──select / 10 s idle──▶ LineStatusBoard ─┐
//!    ▲                             DepartureBoard  ─┤
//!    │                             SystemInfo      ─┤ menu button
//!    └─────────────────────────────────────────────┘
//! MainMenu ──Reboot──▶ run() returns, recovery loop rebuilds everything
//! ```
//!
//! Each screen lives in its own submodule as an `impl Controller` block.

mod departures;
mod line_board;
mod system_info;

use crate::api::{ApiError, Probe, TransitApi, WeatherApi};
use crate::clock::Clock;
use crate::config::{Config, StationConfig};
use crate::display::{DisplayError, TextDisplay};
use crate::input::{Buttons, Interrupt, WaitOutcome};
use crate::network::Network;
use crate::renderer;
use crate::weather::WeatherCache;
use crate::Direction;
use log::{error, info, warn};
use std::ops::ControlFlow;
use std::time::Duration;
use thiserror::Error;

/// Idle time on the main menu before the highlighted entry opens by itself.
pub const MENU_IDLE: Duration = Duration::from_secs(10);
/// Pause after a screen returns, so a held select does not reopen it.
pub const DEBOUNCE: Duration = Duration::from_millis(250);
/// Pause after a successful start-up so its summary can be read.
const INIT_PAUSE: Duration = Duration::from_secs(1);

pub const INITIALISING: &str = "Initialising...";
pub const WIFI_TIMEOUT: &str = "Timeout, exiting";
pub const REBOOTING: &str = "Reboot in 5s";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    #[error("line and line title sizes mismatch ({lines} lines, {titles} titles)")]
    TitleMismatch { lines: usize, titles: usize },
}

/// A validated departure board entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Station {
    title: String,
    lines: Vec<String>,
    line_titles: Vec<String>,
    station_id: String,
    direction: Direction,
}

impl Station {
    /// Build a station, checking that every line has a title.
    pub fn new(
        title: impl Into<String>,
        lines: Vec<String>,
        line_titles: Vec<String>,
        station_id: impl Into<String>,
        direction: Direction,
    ) -> Result<Self, StationError> {
        if lines.len() != line_titles.len() {
            return Err(StationError::TitleMismatch {
                lines: lines.len(),
                titles: line_titles.len(),
            });
        }
        Ok(Self {
            title: title.into(),
            lines,
            line_titles,
            station_id: station_id.into(),
            direction,
        })
    }

    pub fn from_config(config: &StationConfig) -> Result<Self, StationError> {
        Self::new(
            config.title.clone(),
            config.lines.clone(),
            config.line_titles.clone(),
            config.station_id.clone(),
            config.direction.clone(),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_titles(&self) -> &[String] {
        &self.line_titles
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn direction(&self) -> &Direction {
        &self.direction
    }
}

/// Screens the controller can be on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenState {
    MainMenu,
    LineStatusBoard,
    DepartureBoard(Station),
    /// A configured station that failed validation; opening it only shows
    /// the title and goes back to the menu.
    InvalidStation {
        title: String,
        error: StationError,
    },
    SystemInfo,
    Reboot,
}

impl ScreenState {
    /// Menu label of this screen.
    pub fn label(&self) -> &str {
        match self {
            ScreenState::MainMenu => renderer::MENU_TITLE,
            ScreenState::LineStatusBoard => "Line status",
            ScreenState::DepartureBoard(station) => station.title(),
            ScreenState::InvalidStation { title, .. } => title,
            ScreenState::SystemInfo => "System info",
            ScreenState::Reboot => "Reboot",
        }
    }

    /// Menu entries: line status, one per station, system info, reboot.
    pub fn menu(stations: &[StationConfig]) -> Vec<ScreenState> {
        let mut menu = vec![ScreenState::LineStatusBoard];
        for config in stations {
            menu.push(match Station::from_config(config) {
                Ok(station) => ScreenState::DepartureBoard(station),
                Err(error) => {
                    warn!("Station {:?} is misconfigured: {}", config.title, error);
                    ScreenState::InvalidStation {
                        title: config.title.clone(),
                        error,
                    }
                }
            });
        }
        menu.push(ScreenState::SystemInfo);
        menu.push(ScreenState::Reboot);
        menu
    }
}

/// Start-up failures. Any of them sends the device back through the
/// recovery loop.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("WiFi connection timed out after {0:?}")]
    WifiTimeout(Duration),

    #[error("TFL API answered HTTP {0}")]
    TransitUnavailable(u16),

    #[error("Weather API answered HTTP {0}")]
    WeatherUnavailable(u16),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Failures while a screen is running.
#[derive(Error, Debug)]
pub enum ScreenError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Everything the controller talks to.
pub struct Collaborators {
    pub display: Box<dyn TextDisplay>,
    pub buttons: Buttons,
    pub clock: Box<dyn Clock>,
    pub network: Box<dyn Network>,
    pub transit: Box<dyn TransitApi>,
    pub weather: Box<dyn WeatherApi>,
}

/// Controller settings derived from the configuration file.
#[derive(Clone, Debug)]
pub struct Settings {
    pub ssid: String,
    pub password: String,
    pub connect_timeout: Duration,
    pub sync_attempts: u32,
    /// Lines on the line status board, with their titles
    pub status_lines: Vec<String>,
    pub status_titles: Vec<String>,
    pub stations: Vec<StationConfig>,
    pub weather_interval: chrono::Duration,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ssid: config.network.ssid.clone(),
            password: config.network.password.clone(),
            connect_timeout: Duration::from_secs(config.network.connect_timeout_secs),
            sync_attempts: config.time.sync_attempts,
            status_lines: config.board.status_line_ids(),
            status_titles: config.board.status_line_titles(),
            stations: config.board.stations.clone(),
            weather_interval: weather_interval(config.weather.update_interval_secs),
        }
    }
}

/// Cache lifetime for the weather snapshot; out-of-range values never expire.
fn weather_interval(secs: u64) -> chrono::Duration {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}

/// Whether the main loop goes on after a screen returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Stay,
    Exit,
}

pub struct Controller {
    display: Box<dyn TextDisplay>,
    buttons: Buttons,
    clock: Box<dyn Clock>,
    network: Box<dyn Network>,
    transit: Box<dyn TransitApi>,
    weather_api: Box<dyn WeatherApi>,
    weather: WeatherCache,
    settings: Settings,
    menu: Vec<ScreenState>,
    choice: usize,
}

impl Controller {
    pub fn new(parts: Collaborators, settings: Settings) -> Self {
        let menu = ScreenState::menu(&settings.stations);
        Self {
            display: parts.display,
            buttons: parts.buttons,
            clock: parts.clock,
            network: parts.network,
            transit: parts.transit,
            weather_api: parts.weather,
            weather: WeatherCache::new(settings.weather_interval),
            settings,
            menu,
            choice: 0,
        }
    }

    pub fn menu(&self) -> &[ScreenState] {
        &self.menu
    }

    /// Index of the highlighted menu entry.
    pub fn choice(&self) -> usize {
        self.choice
    }

    /// Bring up WiFi, sync the clock and probe both services, reporting each
    /// step on its own row. Stops at the first fatal step.
    pub fn initialise(&mut self) -> Result<(), InitError> {
        renderer::render_title(self.display.as_mut(), INITIALISING)?;

        let timeout = self.settings.connect_timeout;
        if !self
            .network
            .connect(&self.settings.ssid, &self.settings.password, timeout)
        {
            renderer::render_row(self.display.as_mut(), 1, WIFI_TIMEOUT)?;
            return Err(InitError::WifiTimeout(timeout));
        }
        let ip = self.network.ip_address();
        info!("Connected, ip = {}", ip);
        renderer::render_row(self.display.as_mut(), 1, &ip)?;

        let now = self.clock.sync(self.settings.sync_attempts);
        renderer::render_row(self.display.as_mut(), 2, &renderer::date_time_label(now))?;

        let transit = self.transit.test_connection()?;
        info!("TFL API probe: {}", transit);
        renderer::render_row(
            self.display.as_mut(),
            3,
            &renderer::probe_label("TFL API", transit),
        )?;
        if let Probe::Status(code) = transit {
            return Err(InitError::TransitUnavailable(code));
        }

        let weather = self.weather_api.test_connection()?;
        info!("Weather API probe: {}", weather);
        renderer::render_row(
            self.display.as_mut(),
            4,
            &renderer::probe_label("Weather API", weather),
        )?;
        if let Probe::Status(code) = weather {
            return Err(InitError::WeatherUnavailable(code));
        }

        self.clock.sleep(INIT_PAUSE);
        info!("Initialisation complete");
        Ok(())
    }

    /// Main menu loop. Returns when the reboot entry is opened.
    pub fn run(&mut self) -> Result<(), ScreenError> {
        self.display.clear()?;
        self.show_menu(false)?;

        loop {
            let outcome = self.buttons.wait_until(self.clock.as_ref(), None, |idle| {
                Ok::<_, ScreenError>(if idle > MENU_IDLE {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                })
            })?;

            match outcome {
                WaitOutcome::Cancelled(Interrupt::Menu) => {
                    self.choice = (self.choice + 1) % self.menu.len();
                    self.show_menu(true)?;
                    // one sample per tick, also while the button is held
                    self.clock.sleep(self.buttons.tick());
                }
                WaitOutcome::Cancelled(Interrupt::Select) | WaitOutcome::Elapsed => {
                    if self.dispatch()? == Flow::Exit {
                        info!("Exit from the main menu");
                        return Ok(());
                    }
                    self.clock.sleep(DEBOUNCE);
                    self.show_menu(false)?;
                }
            }
        }
    }

    fn show_menu(&mut self, partial: bool) -> Result<(), DisplayError> {
        let labels: Vec<&str> = self.menu.iter().map(ScreenState::label).collect();
        renderer::render_menu(self.display.as_mut(), &labels, self.choice, partial)
    }

    /// Open the highlighted entry and run it until it hands back control.
    fn dispatch(&mut self) -> Result<Flow, ScreenError> {
        let screen = self.menu[self.choice].clone();
        info!("Opening {}", screen.label());
        match screen {
            ScreenState::MainMenu => {}
            ScreenState::LineStatusBoard => self.line_status_board()?,
            ScreenState::DepartureBoard(station) => self.departure_board(&station)?,
            ScreenState::InvalidStation { title, error } => {
                renderer::render_title(self.display.as_mut(), &title)?;
                error!("Cannot open {}: {}", title, error);
            }
            ScreenState::SystemInfo => self.system_info()?,
            ScreenState::Reboot => {
                renderer::render_title(self.display.as_mut(), REBOOTING)?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Stay)
    }
}
