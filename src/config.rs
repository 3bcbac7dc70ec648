//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tube-board.toml file.
//! It covers WiFi credentials, time sync, API keys, the weather location, the
//! boards offered in the main menu and the button pins.
//!
//! Every section is optional; missing sections and fields take the defaults
//! below, which describe the Hammersmith & City, Circle and Central line boards
//! around Wood Lane and White City.

use crate::Direction;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File read by [`Config::load`].
pub const CONFIG_FILE: &str = "tube-board.toml";

/// Application configuration loaded from tube-board.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub time: TimeConfig,
    pub tfl: TflConfig,
    pub weather: WeatherConfig,
    pub board: BoardConfig,
    pub buttons: ButtonConfig,
}

/// WiFi association
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Interface that carries the board's traffic
    pub interface: String,
    /// Network to join; empty leaves association to the OS
    pub ssid: String,
    pub password: String,
    pub connect_timeout_secs: u64,
}

/// Time sync and local time
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeConfig {
    pub ntp_server: String,
    /// Fixed offset from UTC in hours (1 during BST)
    pub tz_offset_hours: i32,
    /// Sync attempts during start-up; sync failure is never fatal
    pub sync_attempts: u32,
}

/// TfL Unified API
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TflConfig {
    pub app_key: String,
    pub base_url: String,
}

/// OpenWeatherMap current conditions
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: String,
    pub lat: f64,
    pub lon: f64,
    /// Seconds a weather snapshot stays fresh
    pub update_interval_secs: u64,
    pub base_url: String,
}

/// What the main menu offers
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Lines on the line status board, top to bottom
    pub status_lines: Vec<LineConfig>,
    /// One departure board per entry, in menu order
    pub stations: Vec<StationConfig>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LineConfig {
    /// Line id as the API knows it (e.g. "hammersmith-city")
    pub id: String,
    /// Short label shown on the board
    pub title: String,
}

/// A departure board entry. The line and title lists are parallel; mismatched
/// lengths are reported when the board is opened.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct StationConfig {
    pub title: String,
    pub lines: Vec<String>,
    pub line_titles: Vec<String>,
    /// NaPTAN id of the station (e.g. "940GZZLUWLA")
    pub station_id: String,
    /// "all" or the first word of the platform names to show
    #[serde(default = "all_directions")]
    pub direction: Direction,
}

/// BCM pin numbers of the two buttons
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub select_pin: u8,
    pub menu_pin: u8,
}

fn all_directions() -> Direction {
    Direction::All
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            interface: "wlan0".to_string(),
            ssid: String::new(),
            password: String::new(),
            connect_timeout_secs: 30,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig {
            ntp_server: "pool.ntp.org".to_string(),
            tz_offset_hours: 1,
            sync_attempts: 2, // keep start-up short
        }
    }
}

impl Default for TflConfig {
    fn default() -> Self {
        TflConfig {
            app_key: String::new(),
            base_url: crate::api::tfl::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            api_key: String::new(),
            // central London
            lat: 51.509865,
            lon: -0.118092,
            update_interval_secs: crate::weather::UPDATE_INTERVAL_SECS as u64,
            base_url: crate::api::openweather::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        let line = |id: &str, title: &str| LineConfig {
            id: id.to_string(),
            title: title.to_string(),
        };
        let station = |title: &str, lines: &[(&str, &str)], station_id: &str, direction: &str| {
            StationConfig {
                title: title.to_string(),
                lines: lines.iter().map(|(id, _)| id.to_string()).collect(),
                line_titles: lines.iter().map(|(_, t)| t.to_string()).collect(),
                station_id: station_id.to_string(),
                direction: Direction::from(direction.to_string()),
            }
        };
        let wood_lane = [("circle", "Circle"), ("hammersmith-city", "H&C")];
        let white_city = [("central", "Central")];

        BoardConfig {
            status_lines: vec![
                line("hammersmith-city", "H&C"),
                line("circle", "Circle"),
                line("central", "Central"),
            ],
            stations: vec![
                station("Wood Lane Westbound", &wood_lane[..], "940GZZLUWLA", "Westbound"),
                station("Wood Lane Eastbound", &wood_lane[..], "940GZZLUWLA", "Eastbound"),
                station("White City Westbound", &white_city[..], "940GZZLUWCY", "Westbound"),
                station("White City Eastbound", &white_city[..], "940GZZLUWCY", "Eastbound"),
            ],
        }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        ButtonConfig {
            select_pin: 15,
            menu_pin: 17,
        }
    }
}

impl BoardConfig {
    pub fn status_line_ids(&self) -> Vec<String> {
        self.status_lines.iter().map(|l| l.id.clone()).collect()
    }

    pub fn status_line_titles(&self) -> Vec<String> {
        self.status_lines.iter().map(|l| l.title.clone()).collect()
    }
}

impl Config {
    /// Load configuration from tube-board.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        "Loaded configuration with {} departure boards",
                        config.board.stations.len()
                    );
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    "No config file at {}, using default configuration",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Write this configuration as TOML to `path`.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
