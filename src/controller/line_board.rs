//! Line status board: weather header, one row per line, clock footer.

use super::{Controller, ScreenError};
use crate::input::{Interrupt, WaitOutcome};
use crate::renderer;
use crate::transit;
use chrono::Timelike;
use log::warn;
use std::ops::ControlFlow;
use std::time::Duration;

/// Time between two full refreshes of the board.
pub const REFRESH: Duration = Duration::from_secs(600);
/// Idle time between two checks whether the clock row needs a new minute.
pub const CLOCK_CHECK: Duration = Duration::from_secs(5);

impl Controller {
    pub(super) fn line_status_board(&mut self) -> Result<(), ScreenError> {
        self.display.clear()?;
        renderer::render_clock_row(self.display.as_mut(), renderer::LOADING, self.clock.now())?;

        // header and footer take two rows
        let fits = self.display.num_rows().saturating_sub(2);
        let count = fits.min(self.settings.status_lines.len());
        if count < self.settings.status_lines.len() {
            warn!(
                "too many lines to display, only the first {} will be shown",
                count
            );
        }
        let lines = self.settings.status_lines[..count].to_vec();
        let titles = self.settings.status_titles[..count.min(self.settings.status_titles.len())]
            .to_vec();

        loop {
            let statuses = transit::line_statuses(self.transit.as_mut(), &lines)?;
            let weather = self
                .weather
                .current(self.weather_api.as_mut(), self.clock.as_ref())?
                .clone();
            let now = self.clock.now();
            renderer::render_line_board(self.display.as_mut(), &weather, &titles, &statuses, now)?;

            let display = self.display.as_mut();
            let clock = self.clock.as_ref();
            let mut last_minute = now.minute();
            let mut last_check = Duration::ZERO;
            let outcome = self.buttons.wait_until(clock, Some(REFRESH), |elapsed| {
                if elapsed - last_check > CLOCK_CHECK {
                    let now = clock.now();
                    if now.minute() != last_minute {
                        renderer::render_clock_row(display, "", now)?;
                        last_minute = now.minute();
                    }
                    last_check = elapsed;
                }
                Ok::<_, ScreenError>(ControlFlow::Continue(()))
            })?;

            if outcome == WaitOutcome::Cancelled(Interrupt::Menu) {
                return Ok(());
            }
            renderer::render_clock_row(self.display.as_mut(), renderer::UPDATING, self.clock.now())?;
        }
    }
}
