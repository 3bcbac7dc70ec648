//! Departure board for one station.
//!
//! After each fetch the header cycles through the status of every line
//! serving the station, one line per step; once all have been shown the board
//! fetches again.

use super::{Controller, ScreenError, Station};
use crate::api::ApiError;
use crate::input::{Interrupt, WaitOutcome};
use crate::renderer;
use crate::transit;
use crate::StatusMode;
use std::ops::ControlFlow;
use std::time::Duration;

/// Idle time between two header steps.
pub const CAROUSEL_STEP: Duration = Duration::from_secs(2);

impl Controller {
    pub(super) fn departure_board(&mut self, station: &Station) -> Result<(), ScreenError> {
        renderer::render_title(self.display.as_mut(), station.title())?;

        loop {
            let arrivals = match transit::arrival_predict(
                self.transit.as_mut(),
                station.lines(),
                station.station_id(),
                station.direction(),
            ) {
                Ok(arrivals) => Ok(arrivals),
                Err(ApiError::Status(code)) => Err(code),
                Err(e) => return Err(e.into()),
            };
            let statuses = transit::line_statuses(self.transit.as_mut(), station.lines())?;

            match &arrivals {
                Ok(arrivals) => renderer::render_departures(
                    self.display.as_mut(),
                    station.title(),
                    arrivals,
                    transit::same_platform(arrivals),
                )?,
                Err(code) => {
                    renderer::render_departures_failed(self.display.as_mut(), station.title(), *code)?
                }
            }

            let display = self.display.as_mut();
            let titles = station.line_titles();
            let mut shown = 0;
            let mut last_step = Duration::ZERO;
            let outcome = self
                .buttons
                .wait_until(self.clock.as_ref(), None, |elapsed| {
                    if elapsed - last_step > CAROUSEL_STEP {
                        if shown == statuses.len() {
                            return Ok(ControlFlow::Break(()));
                        }
                        renderer::render_row_both_sides(
                            display,
                            0,
                            &titles[shown],
                            &statuses[shown].render(StatusMode::Short),
                        )?;
                        shown += 1;
                        last_step = elapsed;
                    }
                    Ok::<_, ScreenError>(ControlFlow::Continue(()))
                })?;

            if outcome == WaitOutcome::Cancelled(Interrupt::Menu) {
                return Ok(());
            }
            renderer::render_row(self.display.as_mut(), 0, renderer::UPDATING)?;
        }
    }
}
