//! Fakes for driving the controller without hardware or network.
//!
//! Every fake is a cheap handle over shared state: clone it, hand one copy to
//! the code under test and keep the other to script responses and inspect
//! call counts afterwards.

use crate::api::{ApiError, Probe, RawArrival, TransitApi, WeatherApi, WeatherReport};
use crate::clock::Clock;
use crate::display::terminal::TerminalDisplay;
use crate::display::{DisplayError, TextDisplay, DEFAULT_COLUMNS, DEFAULT_ROWS};
use crate::input::{Button, Buttons, Interrupt};
use crate::network::Network;
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, TimeZone};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;
use std::time::Duration;

/// Simulated time after which a test is considered stuck.
const RUNAWAY_LIMIT_HOURS: i64 = 48;

/// Clock whose `sleep` advances simulated time instantly.
#[derive(Clone)]
pub struct ManualClock {
    start: DateTime<FixedOffset>,
    now: Rc<Cell<DateTime<FixedOffset>>>,
    syncs: Rc<Cell<u32>>,
}

impl ManualClock {
    /// Starts at 2024-06-03 08:00:00 +01:00.
    pub fn new() -> Self {
        let start = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 3, 8, 0, 0)
            .unwrap();
        Self::starting_at(start)
    }

    pub fn starting_at(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            now: Rc::new(Cell::new(start)),
            syncs: Rc::new(Cell::new(0)),
        }
    }

    /// Simulated time since construction.
    pub fn elapsed(&self) -> ChronoDuration {
        self.now.get() - self.start
    }

    pub fn syncs(&self) -> u32 {
        self.syncs.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        let step = ChronoDuration::from_std(duration).unwrap();
        self.now.set(self.now.get() + step);
        assert!(
            self.elapsed() < ChronoDuration::hours(RUNAWAY_LIMIT_HOURS),
            "simulated time ran away; a scripted button was probably never pressed"
        );
    }

    fn sync(&self, _max_attempts: u32) -> DateTime<FixedOffset> {
        self.syncs.set(self.syncs.get() + 1);
        self.now()
    }
}

#[derive(Default)]
struct TransitState {
    probe: Option<Probe>,
    statuses: HashMap<String, Result<String, u16>>,
    arrivals: HashMap<String, Result<Vec<RawArrival>, u16>>,
    garbled: Vec<String>,
    probe_calls: usize,
    status_calls: usize,
    arrival_calls: usize,
}

/// Transit API answering from tables. Unknown lines report `"Good Service"`
/// and no arrivals.
#[derive(Clone, Default)]
pub struct FakeTransit {
    state: Rc<RefCell<TransitState>>,
}

impl FakeTransit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_probe(&self, probe: Probe) {
        self.state.borrow_mut().probe = Some(probe);
    }

    pub fn set_status(&self, line: &str, text: &str) {
        self.state
            .borrow_mut()
            .statuses
            .insert(line.to_string(), Ok(text.to_string()));
    }

    pub fn fail_status(&self, line: &str, code: u16) {
        self.state
            .borrow_mut()
            .statuses
            .insert(line.to_string(), Err(code));
    }

    /// Status replies for `line` can no longer be decoded.
    pub fn garble_status(&self, line: &str) {
        self.state.borrow_mut().garbled.push(line.to_string());
    }

    pub fn set_arrivals(&self, line: &str, arrivals: Vec<RawArrival>) {
        self.state
            .borrow_mut()
            .arrivals
            .insert(line.to_string(), Ok(arrivals));
    }

    pub fn fail_arrivals(&self, line: &str, code: u16) {
        self.state
            .borrow_mut()
            .arrivals
            .insert(line.to_string(), Err(code));
    }

    pub fn probe_calls(&self) -> usize {
        self.state.borrow().probe_calls
    }

    pub fn status_calls(&self) -> usize {
        self.state.borrow().status_calls
    }

    pub fn arrival_calls(&self) -> usize {
        self.state.borrow().arrival_calls
    }
}

impl TransitApi for FakeTransit {
    fn test_connection(&mut self) -> Result<Probe, ApiError> {
        let mut state = self.state.borrow_mut();
        state.probe_calls += 1;
        Ok(state.probe.unwrap_or(Probe::Ok))
    }

    fn fetch_status(&mut self, line: &str) -> Result<String, ApiError> {
        let mut state = self.state.borrow_mut();
        state.status_calls += 1;
        if state.garbled.iter().any(|l| l == line) {
            return Err(ApiError::Decode(format!("no status for {}", line)));
        }
        match state.statuses.get(line) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(code)) => Err(ApiError::Status(*code)),
            None => Ok(crate::GOOD_SERVICE.to_string()),
        }
    }

    fn fetch_arrivals(&mut self, line: &str, _station_id: &str) -> Result<Vec<RawArrival>, ApiError> {
        let mut state = self.state.borrow_mut();
        state.arrival_calls += 1;
        match state.arrivals.get(line) {
            Some(Ok(arrivals)) => Ok(arrivals.clone()),
            Some(Err(code)) => Err(ApiError::Status(*code)),
            None => Ok(Vec::new()),
        }
    }
}

struct WeatherState {
    report: Result<WeatherReport, u16>,
    probe: Probe,
    fetches: usize,
    probe_calls: usize,
}

/// Weather API returning a settable report.
#[derive(Clone)]
pub struct FakeWeather {
    state: Rc<RefCell<WeatherState>>,
}

impl FakeWeather {
    pub fn new(report: WeatherReport) -> Self {
        Self {
            state: Rc::new(RefCell::new(WeatherState {
                report: Ok(report),
                probe: Probe::Ok,
                fetches: 0,
                probe_calls: 0,
            })),
        }
    }

    pub fn set_report(&self, report: WeatherReport) {
        self.state.borrow_mut().report = Ok(report);
    }

    pub fn fail_with(&self, code: u16) {
        self.state.borrow_mut().report = Err(code);
    }

    pub fn set_probe(&self, probe: Probe) {
        self.state.borrow_mut().probe = probe;
    }

    pub fn fetches(&self) -> usize {
        self.state.borrow().fetches
    }

    pub fn probe_calls(&self) -> usize {
        self.state.borrow().probe_calls
    }
}

impl WeatherApi for FakeWeather {
    fn test_connection(&mut self) -> Result<Probe, ApiError> {
        let mut state = self.state.borrow_mut();
        state.probe_calls += 1;
        Ok(state.probe)
    }

    fn fetch(&mut self) -> Result<WeatherReport, ApiError> {
        let mut state = self.state.borrow_mut();
        state.fetches += 1;
        match &state.report {
            Ok(report) => Ok(report.clone()),
            Err(code) => Err(ApiError::Status(*code)),
        }
    }
}

/// Network that connects (or not) instantly.
#[derive(Clone)]
pub struct FakeNetwork {
    connects: bool,
    ip: String,
    mac: String,
    connect_calls: Rc<Cell<usize>>,
}

impl FakeNetwork {
    pub fn connected() -> Self {
        Self {
            connects: true,
            ip: "192.168.1.20".to_string(),
            mac: "28:cd:c1:0a:1b:2c".to_string(),
            connect_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            connects: false,
            ..Self::connected()
        }
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.get()
    }
}

impl Network for FakeNetwork {
    fn connect(&mut self, _ssid: &str, _password: &str, _timeout: Duration) -> bool {
        self.connect_calls.set(self.connect_calls.get() + 1);
        self.connects
    }

    /// Last address handed out, kept while the link is down.
    fn ip_address(&self) -> String {
        self.ip.clone()
    }

    fn hardware_id(&self) -> String {
        self.mac.clone()
    }

    fn is_connected(&self) -> bool {
        self.connects
    }
}

/// Every frame committed to a [`RecordingDisplay`], oldest first.
#[derive(Clone, Default)]
pub struct Frames {
    shown: Rc<RefCell<Vec<Vec<String>>>>,
}

impl Frames {
    pub fn all(&self) -> Vec<Vec<String>> {
        self.shown.borrow().clone()
    }

    pub fn last(&self) -> Option<Vec<String>> {
        self.shown.borrow().last().cloned()
    }

    /// Any committed frame with `text` as a whole row.
    pub fn any_row(&self, text: &str) -> bool {
        self.shown
            .borrow()
            .iter()
            .any(|frame| frame.iter().any(|row| row == text))
    }

    /// First committed frame satisfying `predicate`.
    pub fn find(&self, predicate: impl Fn(&[String]) -> bool) -> Option<Vec<String>> {
        self.shown
            .borrow()
            .iter()
            .find(|frame| predicate(frame.as_slice()))
            .cloned()
    }

    fn push(&self, frame: Vec<String>) {
        self.shown.borrow_mut().push(frame);
    }
}

/// Panel-sized text display that records each committed frame.
pub struct RecordingDisplay {
    inner: TerminalDisplay<io::Sink>,
    frames: Frames,
}

impl RecordingDisplay {
    pub fn new(frames: &Frames) -> Self {
        Self {
            inner: TerminalDisplay::new(io::sink(), DEFAULT_ROWS, DEFAULT_COLUMNS),
            frames: frames.clone(),
        }
    }
}

impl TextDisplay for RecordingDisplay {
    fn num_rows(&self) -> usize {
        self.inner.num_rows()
    }

    fn text(&mut self, row: usize, text: &str) -> Result<(), DisplayError> {
        self.inner.text(row, text)
    }

    fn text_both_sides(&mut self, row: usize, left: &str, right: &str) -> Result<(), DisplayError> {
        self.inner.text_both_sides(row, left, right)
    }

    fn clear_row(&mut self, row: usize) -> Result<(), DisplayError> {
        self.inner.clear_row(row)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.inner.clear()
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        self.frames.push(self.inner.rows().to_vec());
        self.inner.show()
    }
}

type FramePredicate = Box<dyn Fn(&[String]) -> bool>;

struct Step {
    button: Interrupt,
    when: FramePredicate,
}

/// Ordered button presses, each released once its predicate holds for the
/// last committed frame.
#[derive(Clone)]
pub struct Script {
    steps: Rc<RefCell<VecDeque<Step>>>,
    frames: Frames,
}

impl Script {
    pub fn new(frames: &Frames) -> Self {
        Self {
            steps: Rc::new(RefCell::new(VecDeque::new())),
            frames: frames.clone(),
        }
    }

    pub fn press_when(
        &self,
        button: Interrupt,
        when: impl Fn(&[String]) -> bool + 'static,
    ) -> &Self {
        self.steps.borrow_mut().push_back(Step {
            button,
            when: Box::new(when),
        });
        self
    }

    /// Press `button` once `text` is on screen as a whole row.
    pub fn press_on(&self, button: Interrupt, text: &str) -> &Self {
        let text = text.to_string();
        self.press_when(button, move |rows| rows.iter().any(|row| *row == text))
    }

    pub fn remaining(&self) -> usize {
        self.steps.borrow().len()
    }

    pub fn buttons(&self) -> Buttons {
        Buttons::new(
            Box::new(ScriptedButton {
                which: Interrupt::Select,
                script: self.clone(),
            }),
            Box::new(ScriptedButton {
                which: Interrupt::Menu,
                script: self.clone(),
            }),
        )
    }

    fn take(&self, which: Interrupt) -> bool {
        let frame = self.frames.last().unwrap_or_default();
        let mut steps = self.steps.borrow_mut();
        let ready = steps
            .front()
            .is_some_and(|step| step.button == which && (step.when)(frame.as_slice()));
        if ready {
            steps.pop_front();
        }
        ready
    }
}

struct ScriptedButton {
    which: Interrupt,
    script: Script,
}

impl Button for ScriptedButton {
    fn value(&mut self) -> u8 {
        if self.script.take(self.which) {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_presses_in_order_once_frame_matches() {
        let frames = Frames::default();
        let script = Script::new(&frames);
        script
            .press_on(Interrupt::Menu, "x Line status")
            .press_on(Interrupt::Select, "x Reboot");
        let mut buttons = script.buttons();
        let mut display = RecordingDisplay::new(&frames);

        assert_eq!(buttons.sample(), None);

        display.text(2, "x Reboot").unwrap();
        display.show().unwrap();
        // front step still waits for its frame
        assert_eq!(buttons.sample(), None);

        display.text(2, "x Line status").unwrap();
        display.show().unwrap();
        assert_eq!(buttons.sample(), Some(Interrupt::Menu));
        assert_eq!(buttons.sample(), None);

        display.text(2, "x Reboot").unwrap();
        display.show().unwrap();
        assert_eq!(buttons.sample(), Some(Interrupt::Select));
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn manual_clock_advances_on_sleep() {
        let clock = ManualClock::new();
        clock.sleep(Duration::from_millis(250));
        assert_eq!(clock.elapsed().num_milliseconds(), 250);
        clock.sync(2);
        assert_eq!(clock.syncs(), 1);
    }
}
