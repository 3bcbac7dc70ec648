//! # Recovery Loop
//!
//! The outermost failure boundary: build a controller, initialise it, run the
//! main menu. Whatever happens, the controller and everything it owns are
//! dropped, the loop waits a fixed delay and starts over.

use crate::clock::Clock;
use crate::controller::Controller;
use anyhow::Context;
use log::{error, info};
use std::time::Duration;

/// Wait between two cycles.
pub const RESTART_DELAY: Duration = Duration::from_secs(5);

/// How one build-initialise-run cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The reboot entry was opened
    Rebooted,
    /// Start-up stopped at a fatal step
    InitFailed,
    /// Building the controller or running a screen failed
    Crashed,
}

/// Run cycles until `cycles` is reached, or forever when it is `None`.
///
/// Returns the outcome of every cycle.
pub fn supervise<F>(
    clock: &dyn Clock,
    restart_delay: Duration,
    cycles: Option<u32>,
    mut build: F,
) -> Vec<CycleOutcome>
where
    F: FnMut() -> anyhow::Result<Controller>,
{
    let mut outcomes = Vec::new();
    while cycles.map_or(true, |limit| (outcomes.len() as u32) < limit) {
        let outcome = run_cycle(&mut build);
        outcomes.push(outcome);
        info!("Restart in {} seconds", restart_delay.as_secs());
        clock.sleep(restart_delay);
    }
    outcomes
}

/// One cycle; the controller is dropped before this returns.
pub fn run_cycle<F>(build: &mut F) -> CycleOutcome
where
    F: FnMut() -> anyhow::Result<Controller>,
{
    let mut controller = match build().context("building controller") {
        Ok(controller) => controller,
        Err(e) => {
            error!("{:#}", e);
            return CycleOutcome::Crashed;
        }
    };

    if let Err(e) = controller.initialise() {
        error!("Initialisation failed: {}", e);
        return CycleOutcome::InitFailed;
    }

    match controller.run().context("main loop") {
        Ok(()) => CycleOutcome::Rebooted,
        Err(e) => {
            error!("{:#}", e);
            CycleOutcome::Crashed
        }
    }
}
