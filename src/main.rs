//! # Tube Board Application Entry Point
//!
//! This binary wires the host collaborators (HTTP clients, system clock, WiFi,
//! display, buttons) into a controller and runs it under the recovery loop.
//! It supports both panel mode (pixel frame) and development mode (text rows on
//! stdout).
//!
//! ```text
//! tube-board [--stdout] [--write-config]
//! ```

use anyhow::Context;
use log::info;
use std::env;
use std::io;
use tokio::runtime::Handle;
use tube_board_lib::api::{openweather::OpenWeatherClient, tfl::TflClient};
use tube_board_lib::clock::{offset_from_hours, SystemClock};
use tube_board_lib::config::{Config, CONFIG_FILE};
use tube_board_lib::controller::{Collaborators, Controller, Settings};
use tube_board_lib::display::frame::{FrameDisplay, HalfBlockPreview};
use tube_board_lib::display::terminal::TerminalDisplay;
use tube_board_lib::display::TextDisplay;
use tube_board_lib::input::Buttons;
use tube_board_lib::network::LinuxNetwork;
use tube_board_lib::recovery::{supervise, RESTART_DELAY};

/// Assemble a fresh controller; called once per recovery cycle so every
/// resource is released and reacquired between cycles.
fn build_controller(
    config: &Config,
    runtime: Handle,
    development_mode: bool,
) -> anyhow::Result<Controller> {
    let display: Box<dyn TextDisplay> = if development_mode {
        Box::new(TerminalDisplay::stdout())
    } else {
        Box::new(FrameDisplay::new(HalfBlockPreview::new(io::stdout())))
    };

    let transit = TflClient::new(runtime.clone(), &config.tfl.base_url, &config.tfl.app_key)
        .context("creating TfL client")?;
    let weather = OpenWeatherClient::new(
        runtime,
        &config.weather.base_url,
        &config.weather.api_key,
        config.weather.lat,
        config.weather.lon,
    )
    .context("creating weather client")?;

    let clock = SystemClock::new(
        offset_from_hours(config.time.tz_offset_hours),
        config.time.ntp_server.clone(),
    );

    Ok(Controller::new(
        Collaborators {
            display,
            buttons: open_buttons(config)?,
            clock: Box::new(clock),
            network: Box::new(LinuxNetwork::new(config.network.interface.clone())),
            transit: Box::new(transit),
            weather: Box::new(weather),
        },
        Settings::from_config(config),
    ))
}

#[cfg(all(target_os = "linux", feature = "hardware"))]
fn open_buttons(config: &Config) -> anyhow::Result<Buttons> {
    let (select, menu) =
        tube_board_lib::gpio::open_buttons(config.buttons.select_pin, config.buttons.menu_pin)
            .context("claiming button pins")?;
    info!(
        "Buttons on GPIO {} (select) and {} (menu)",
        config.buttons.select_pin, config.buttons.menu_pin
    );
    Ok(Buttons::new(Box::new(select), Box::new(menu)))
}

#[cfg(not(all(target_os = "linux", feature = "hardware")))]
fn open_buttons(_config: &Config) -> anyhow::Result<Buttons> {
    use tube_board_lib::input::ReleasedButton;

    log::warn!("Button support not enabled. Rebuild with --features hardware for GPIO buttons.");
    Ok(Buttons::new(
        Box::new(ReleasedButton),
        Box::new(ReleasedButton),
    ))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Development mode: text rows on stdout instead of the pixel frame
    let development_mode = env::args().any(|arg| arg == "--stdout");

    if env::args().any(|arg| arg == "--write-config") {
        Config::default().save_to_path(CONFIG_FILE)?;
        return Ok(());
    }

    let config = Config::load();

    // HTTP clients block on this runtime from the controller thread
    let rt = tokio::runtime::Runtime::new()?;

    let clock = SystemClock::new(
        offset_from_hours(config.time.tz_offset_hours),
        config.time.ntp_server.clone(),
    );

    info!("Starting tube board");
    supervise(&clock, RESTART_DELAY, None, || {
        build_controller(&config, rt.handle().clone(), development_mode)
    });

    Ok(())
}
