//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history, and lets tests script keypad, RFID, button and room readings.

use std::collections::VecDeque;

use comfortctl::app::events::AppEvent;
use comfortctl::app::ports::{
    ActuatorPort, AuthMarkerPort, DisplayPort, EventSink, InputPort, LedId, SensorPort,
};
use comfortctl::app::service::ControlService;
use comfortctl::auth::TagUid;
use comfortctl::config::{NtcParams, SystemConfig};
use comfortctl::fsm::Mode;
use comfortctl::sensors::thermistor::celsius_to_ratio;

pub const GOOD_TAG: TagUid = [0x9A, 0xD5, 0xB3, 0x05];
pub const LOOP_MS: u64 = 100;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    Relay(bool),
    Servo(u8),
    Buzzer(bool),
    Led(LedId, bool),
}

// ── MockHw ────────────────────────────────────────────────────

pub struct MockHw {
    pub calls: Vec<ActuatorCall>,
    pub lines: Vec<(String, String)>,
    pub keys: VecDeque<char>,
    pub tags: VecDeque<TagUid>,
    pub button: bool,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub light: u16,
    ntc: NtcParams,
}

#[allow(dead_code)]
impl MockHw {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            lines: Vec::new(),
            keys: VecDeque::new(),
            tags: VecDeque::new(),
            button: false,
            temperature_c: 25.0,
            humidity_pct: 50.0,
            light: 500,
            ntc: NtcParams::default(),
        }
    }

    pub fn type_keys(&mut self, keys: &str) {
        self.keys.extend(keys.chars());
    }

    pub fn present_tag(&mut self, uid: TagUid) {
        self.tags.push_back(uid);
    }

    pub fn set_room(&mut self, temperature_c: f32, humidity_pct: f32) {
        self.temperature_c = temperature_c;
        self.humidity_pct = humidity_pct;
    }

    pub fn relay_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Relay(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Buzzer(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn servo_deg(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Servo(deg) => Some(*deg),
            _ => None,
        })
    }

    pub fn led_on(&self, led: LedId) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Led(l, on) if *l == led => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn last_lines(&self) -> Option<(&str, &str)> {
        self.lines.last().map(|(a, b)| (a.as_str(), b.as_str()))
    }
}

impl Default for MockHw {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHw {
    fn read_raw_temperature(&mut self) -> f32 {
        celsius_to_ratio(self.temperature_c, &self.ntc)
    }

    fn read_raw_humidity(&mut self) -> f32 {
        self.humidity_pct
    }

    fn read_raw_light(&mut self) -> u16 {
        self.light
    }
}

impl ActuatorPort for MockHw {
    fn set_relay(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Relay(on));
    }

    fn set_servo_angle(&mut self, degrees: u8) {
        self.calls.push(ActuatorCall::Servo(degrees));
    }

    fn set_buzzer(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Buzzer(on));
    }

    fn set_led(&mut self, led: LedId, on: bool) {
        self.calls.push(ActuatorCall::Led(led, on));
    }
}

impl InputPort for MockHw {
    fn poll_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }

    fn poll_tag(&mut self) -> Option<TagUid> {
        self.tags.pop_front()
    }

    fn button_pressed(&mut self) -> bool {
        self.button
    }
}

impl DisplayPort for MockHw {
    fn show_lines(&mut self, line0: &str, line1: &str) {
        self.lines.push((line0.to_owned(), line1.to_owned()));
    }
}

// ── Event and marker recorders ────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn mode_changes(&self) -> Vec<(Mode, Mode)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ModeChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

#[derive(Default)]
pub struct MockMarker {
    pub marks: Vec<TagUid>,
}

impl AuthMarkerPort for MockMarker {
    fn mark_authorized(&mut self, uid: TagUid) {
        self.marks.push(uid);
    }
}

// ── Rig: service + mocks + simulated clock ────────────────────

pub struct Rig {
    pub service: ControlService,
    pub hw: MockHw,
    pub sink: RecordingSink,
    pub marker: MockMarker,
    pub now_ms: u64,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    pub fn with_config(config: SystemConfig) -> Self {
        let mut rig = Self {
            service: ControlService::new(config).expect("valid config"),
            hw: MockHw::new(),
            sink: RecordingSink::default(),
            marker: MockMarker::default(),
            now_ms: 0,
        };
        rig.service.start(0, &mut rig.hw, &mut rig.sink);
        rig
    }

    pub fn mode(&self) -> Mode {
        self.service.mode()
    }

    /// One control-loop iteration.
    pub fn tick(&mut self) {
        self.now_ms += LOOP_MS;
        self.service
            .tick(self.now_ms, &mut self.hw, &mut self.marker, &mut self.sink);
    }

    pub fn run_for(&mut self, ms: u64) {
        let end = self.now_ms + ms;
        while self.now_ms < end {
            self.tick();
        }
    }

    /// Tick until `mode` is reached.  Returns the elapsed time, or `None`
    /// if it did not happen within `limit_ms`.
    pub fn run_until(&mut self, mode: Mode, limit_ms: u64) -> Option<u64> {
        let start = self.now_ms;
        while self.now_ms - start < limit_ms {
            self.tick();
            if self.mode() == mode {
                return Some(self.now_ms - start);
            }
        }
        None
    }

    /// Code and tag, through the settle window into `Monitoring`.
    pub fn authorize(&mut self) {
        self.hw.type_keys("1234");
        assert_eq!(self.run_until(Mode::TagWait, 1_000), Some(400));
        self.hw.present_tag(GOOD_TAG);
        self.run_until(Mode::Monitoring, 6_000)
            .expect("settle window should end in Monitoring");
    }
}
