//! # Time Source
//!
//! Wall-clock reads with a fixed UTC offset, tick sleeping and best-effort
//! network time sync. The controller only ever talks to the [`Clock`] trait so
//! tests can substitute a manual clock whose `sleep` advances simulated time.

use crate::ntp;
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Offset, Utc};
use log::{info, warn};
use std::cell::Cell;
use std::time::Duration;

/// Pause between two failed sync attempts.
const SYNC_RETRY_PAUSE: Duration = Duration::from_millis(500);

/// Trait for abstracting time operations
pub trait Clock {
    /// Current local time, offset already applied
    fn now(&self) -> DateTime<FixedOffset>;

    /// Block the calling thread (or advance simulated time)
    fn sleep(&self, duration: Duration);

    /// Try to correct the clock against a time server.
    ///
    /// Never fails: after `max_attempts` unsuccessful tries the clock keeps its
    /// previous value. Returns the (possibly unchanged) local time.
    fn sync(&self, max_attempts: u32) -> DateTime<FixedOffset> {
        let _ = max_attempts;
        self.now()
    }
}

/// Build a fixed offset from whole hours, clamping to the valid range.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    let hours = hours.clamp(-23, 23);
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// System clock with a fixed timezone offset and an SNTP correction.
///
/// The correction is kept in-process rather than written to the system clock,
/// so syncing does not require elevated privileges.
pub struct SystemClock {
    offset: FixedOffset,
    ntp_server: String,
    correction: Cell<ChronoDuration>,
}

impl SystemClock {
    pub fn new(offset: FixedOffset, ntp_server: impl Into<String>) -> Self {
        Self {
            offset,
            ntp_server: ntp_server.into(),
            correction: Cell::new(ChronoDuration::zero()),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        (Utc::now() + self.correction.get()).with_timezone(&self.offset)
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn sync(&self, max_attempts: u32) -> DateTime<FixedOffset> {
        info!("Time before sync: {}", self.now().format("%Y-%m-%d %H:%M:%S"));
        for attempt in 1..=max_attempts {
            match ntp::query(&self.ntp_server) {
                Ok(server_time) => {
                    self.correction.set(server_time - Utc::now());
                    info!(
                        "Time after sync: {} after {} tries",
                        self.now().format("%Y-%m-%d %H:%M:%S"),
                        attempt
                    );
                    return self.now();
                }
                Err(e) => {
                    warn!("Time sync failed: {}, try {}/{}", e, attempt, max_attempts);
                    if attempt < max_attempts {
                        self.sleep(SYNC_RETRY_PAUSE);
                    }
                }
            }
        }
        warn!("Continuing with unsynced clock");
        self.now()
    }
}
