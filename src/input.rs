//! # Input Sampler
//!
//! Two active-low buttons, polled once per tick. [`Buttons::wait_until`] is the
//! single wait primitive every screen uses: it returns as soon as a button is
//! seen pressed, when an optional time limit is reached, or when the per-tick
//! callback asks to stop.

use crate::clock::Clock;
use std::ops::ControlFlow;
use std::time::Duration;

/// Polling period of the controller.
pub const TICK: Duration = Duration::from_millis(100);

/// A sampled digital input. `value()` is `0` while pressed.
pub trait Button {
    fn value(&mut self) -> u8;

    fn is_pressed(&mut self) -> bool {
        self.value() == 0
    }
}

/// Stand-in for a board without buttons: never pressed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReleasedButton;

impl Button for ReleasedButton {
    fn value(&mut self) -> u8 {
        1
    }
}

/// Which button cut a wait short.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    Select,
    Menu,
}

/// How a wait ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Limit reached, or the tick callback broke out
    Elapsed,
    Cancelled(Interrupt),
}

/// The select and menu buttons plus the tick they are sampled at.
pub struct Buttons {
    select: Box<dyn Button>,
    menu: Box<dyn Button>,
    tick: Duration,
}

impl Buttons {
    pub fn new(select: Box<dyn Button>, menu: Box<dyn Button>) -> Self {
        Self::with_tick(select, menu, TICK)
    }

    pub fn with_tick(select: Box<dyn Button>, menu: Box<dyn Button>, tick: Duration) -> Self {
        Self { select, menu, tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Read both buttons once. Select takes precedence when both are down.
    pub fn sample(&mut self) -> Option<Interrupt> {
        if self.select.is_pressed() {
            Some(Interrupt::Select)
        } else if self.menu.is_pressed() {
            Some(Interrupt::Menu)
        } else {
            None
        }
    }

    /// Poll until a button is pressed, `limit` of tick time has passed, or
    /// `on_tick` breaks.
    ///
    /// Each iteration samples the buttons, checks the limit, sleeps one tick and
    /// then calls `on_tick` with the tick time accumulated so far. Errors from
    /// `on_tick` end the wait and are returned as is.
    pub fn wait_until<E, F>(
        &mut self,
        clock: &dyn Clock,
        limit: Option<Duration>,
        mut on_tick: F,
    ) -> Result<WaitOutcome, E>
    where
        F: FnMut(Duration) -> Result<ControlFlow<()>, E>,
    {
        let mut elapsed = Duration::ZERO;
        loop {
            if let Some(interrupt) = self.sample() {
                return Ok(WaitOutcome::Cancelled(interrupt));
            }
            if limit.is_some_and(|limit| elapsed >= limit) {
                return Ok(WaitOutcome::Elapsed);
            }
            clock.sleep(self.tick);
            elapsed += self.tick;
            if on_tick(elapsed)?.is_break() {
                return Ok(WaitOutcome::Elapsed);
            }
        }
    }
}
