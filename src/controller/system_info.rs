//! System info screen.

use super::{Controller, ScreenError};
use crate::input::{Interrupt, WaitOutcome};
use crate::network::{compact_hardware_id, UNASSIGNED_IP};
use crate::renderer::{self, SystemInfo};
use std::ops::ControlFlow;

/// Ticks between two redraws; each redraw probes both services again.
pub const REDRAW_TICKS: u32 = 100;

impl Controller {
    pub(super) fn system_info(&mut self) -> Result<(), ScreenError> {
        let redraw_after = self.buttons.tick() * REDRAW_TICKS;
        loop {
            let info = SystemInfo {
                mac: compact_hardware_id(&self.network.hardware_id()),
                ip: if self.network.is_connected() {
                    self.network.ip_address()
                } else {
                    UNASSIGNED_IP.to_string()
                },
                transit: self.transit.test_connection()?,
                weather: self.weather_api.test_connection()?,
                now: self.clock.now(),
            };
            renderer::render_system_info(self.display.as_mut(), &info)?;

            let outcome = self
                .buttons
                .wait_until(self.clock.as_ref(), Some(redraw_after), |_| {
                    Ok::<_, ScreenError>(ControlFlow::Continue(()))
                })?;
            if outcome == WaitOutcome::Cancelled(Interrupt::Menu) {
                return Ok(());
            }
        }
    }
}
