//! Classroom simulator: runs the control service against simulated pins,
//! a simple room model and a scripted keypad / RFID / button session.
//!
//! ```text
//! classroom-sim [CONFIG.json] [--realtime] [--duration-ms N]
//! ```
//!
//! Without `--realtime` the clock is simulated and the whole session runs
//! as fast as the log can be written.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use log::{debug, info};

use comfortctl::adapters::auth_store::{AuthMarkerStore, AuthRecord};
use comfortctl::adapters::hardware::HardwareActuators;
use comfortctl::adapters::log_display::LogDisplay;
use comfortctl::adapters::log_sink::LogEventSink;
use comfortctl::adapters::memory_store::MemoryStore;
use comfortctl::adapters::time::MonotonicClock;
use comfortctl::app::ports::{ActuatorPort, DisplayPort, InputPort, LedId, SensorPort};
use comfortctl::app::service::ControlService;
use comfortctl::auth::TagUid;
use comfortctl::config::{NtcParams, SystemConfig};
use comfortctl::drivers::buzzer::Buzzer;
use comfortctl::drivers::relay::Relay;
use comfortctl::drivers::servo::Servo;
use comfortctl::drivers::status_led::StatusLeds;
use comfortctl::fsm::Mode;
use comfortctl::sensors::thermistor::celsius_to_ratio;

const DEFAULT_DURATION_MS: u64 = 30_000;

// ── Simulated peripherals ─────────────────────────────────────

struct SimPin {
    name: &'static str,
    high: bool,
}

impl SimPin {
    fn new(name: &'static str) -> Self {
        Self { name, high: false }
    }
}

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.high {
            debug!("pin {} low", self.name);
        }
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            debug!("pin {} high", self.name);
        }
        self.high = true;
        Ok(())
    }
}

/// 50 Hz channel with one count per microsecond.
struct SimPwm {
    duty: u16,
}

impl PwmErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        20_000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        debug!("servo pwm duty {}", self.duty);
        Ok(())
    }
}

type SimActuators = HardwareActuators<SimPin, SimPin, SimPwm, SimPin, SimPin, SimPin>;

// ── Room model ────────────────────────────────────────────────

/// First-order room: the fan cools it, an open vent lets in cooler air.
struct Room {
    temperature_c: f32,
    humidity_pct: f32,
    light: u16,
}

impl Room {
    fn step(&mut self, dt_ms: u64, fan_on: bool, vent_open: bool) {
        let dt_s = dt_ms as f32 / 1000.0;
        if fan_on {
            self.temperature_c -= 0.1 * dt_s;
        }
        if vent_open {
            self.temperature_c -= 0.05 * dt_s;
            self.humidity_pct = (self.humidity_pct + 0.2 * dt_s).min(100.0);
        }
    }
}

// ── Scripted session ──────────────────────────────────────────

#[derive(Clone, Copy)]
enum Step {
    Keys(&'static str),
    Tag(TagUid),
    Button(bool),
}

/// Wrong code, button release from lockout, correct code, tag, then a
/// warm room that escalates to the alarm, acknowledged with `#`.
const SCRIPT: &[(u64, Step)] = &[
    (300, Step::Keys("9999")),
    (1_000, Step::Button(true)),
    (1_300, Step::Button(false)),
    (1_500, Step::Keys("1234")),
    (2_500, Step::Tag([0x9A, 0xD5, 0xB3, 0x05])),
    (26_000, Step::Keys("#")),
];

// ── Composite hardware ────────────────────────────────────────

struct SimHardware {
    actuators: SimActuators,
    display: LogDisplay,
    room: Room,
    ntc: NtcParams,
    keys: VecDeque<char>,
    tags: VecDeque<TagUid>,
    button: bool,
    script: VecDeque<(u64, Step)>,
}

impl SimHardware {
    fn new(config: &SystemConfig) -> Result<Self> {
        let relay = Relay::new(SimPin::new("relay"))?;
        let buzzer = Buzzer::new(SimPin::new("buzzer"))?;
        let servo = Servo::new(SimPwm { duty: 0 }, config.servo_closed_deg)?;
        let leds = StatusLeds::new(
            SimPin::new("led_red"),
            SimPin::new("led_blue"),
            SimPin::new("led_green"),
        )
        .map_err(|e| anyhow!("status LEDs: {:?}", e))?;

        Ok(Self {
            actuators: HardwareActuators::new(relay, buzzer, servo, leds),
            display: LogDisplay::new(),
            room: Room {
                temperature_c: 32.0,
                humidity_pct: 30.0,
                light: 640,
            },
            ntc: config.ntc,
            keys: VecDeque::new(),
            tags: VecDeque::new(),
            button: false,
            script: SCRIPT.iter().copied().collect(),
        })
    }

    /// Feed script steps that are due and advance the room.
    fn advance(&mut self, now_ms: u64, dt_ms: u64, closed_deg: u8) {
        while let Some(&(at, step)) = self.script.front() {
            if at > now_ms {
                break;
            }
            self.script.pop_front();
            match step {
                Step::Keys(keys) => {
                    info!("SIM   | keys {:?}", keys);
                    self.keys.extend(keys.chars());
                }
                Step::Tag(uid) => {
                    info!("SIM   | tag presented");
                    self.tags.push_back(uid);
                }
                Step::Button(down) => {
                    info!("SIM   | button {}", if down { "down" } else { "up" });
                    self.button = down;
                }
            }
        }
        let vent_open = self.actuators.servo_angle() != closed_deg;
        self.room.step(dt_ms, self.actuators.relay_on(), vent_open);
    }
}

impl SensorPort for SimHardware {
    fn read_raw_temperature(&mut self) -> f32 {
        celsius_to_ratio(self.room.temperature_c, &self.ntc)
    }

    fn read_raw_humidity(&mut self) -> f32 {
        self.room.humidity_pct
    }

    fn read_raw_light(&mut self) -> u16 {
        self.room.light
    }
}

impl ActuatorPort for SimHardware {
    fn set_relay(&mut self, on: bool) {
        self.actuators.set_relay(on);
    }

    fn set_servo_angle(&mut self, degrees: u8) {
        self.actuators.set_servo_angle(degrees);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.actuators.set_buzzer(on);
    }

    fn set_led(&mut self, led: LedId, on: bool) {
        self.actuators.set_led(led, on);
    }
}

impl InputPort for SimHardware {
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

impl DisplayPort for SimHardware {
    fn show_lines(&mut self, line0: &str, line1: &str) {
        self.display.show_lines(line0, line1);
    }
}

// ── Entry point ───────────────────────────────────────────────

struct Args {
    config_path: Option<String>,
    realtime: bool,
    duration_ms: u64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config_path: None,
        realtime: false,
        duration_ms: DEFAULT_DURATION_MS,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--realtime" => args.realtime = true,
            "--duration-ms" => {
                let value = it.next().context("--duration-ms needs a value")?;
                args.duration_ms = value
                    .parse()
                    .with_context(|| format!("bad duration {:?}", value))?;
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            path => args.config_path = Some(path.to_owned()),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&str>) -> Result<SystemConfig> {
    let Some(path) = path else {
        return Ok(SystemConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    SystemConfig::from_json(&text).map_err(|e| anyhow!("{}: {}", path, e))
}

/// Outcome of one simulated session.
struct SessionReport {
    final_mode: Mode,
    ticks: u64,
    last_record: Option<AuthRecord>,
}

/// Run the scripted session for `duration_ms` of control time.
fn run_session(config: SystemConfig, duration_ms: u64, realtime: bool) -> Result<SessionReport> {
    let mut hw = SimHardware::new(&config)?;
    let mut marker = AuthMarkerStore::new(MemoryStore::new());
    let mut sink = LogEventSink::new();
    let mut service = ControlService::new(config)?;
    let interval = u64::from(service.config().control_loop_interval_ms);
    let closed_deg = service.config().servo_closed_deg;

    info!(
        "classroom-sim: {} ms session, {} ms loop, {} clock",
        duration_ms,
        interval,
        if realtime { "wall" } else { "simulated" }
    );

    let clock = MonotonicClock::new();
    let mut now_ms: u64 = 0;
    service.start(now_ms, &mut hw, &mut sink);

    while now_ms < duration_ms {
        now_ms += interval;
        if realtime {
            let elapsed = clock.now_ms();
            if elapsed < now_ms {
                std::thread::sleep(Duration::from_millis(now_ms - elapsed));
            }
        }
        hw.advance(now_ms, interval, closed_deg);
        service.tick(now_ms, &mut hw, &mut marker, &mut sink);
    }

    info!(
        "classroom-sim: finished in {:?} ({} ms in mode) after {} ticks, {} screen redraws",
        service.mode(),
        service.core().ms_in_mode(),
        service.tick_count(),
        hw.display.frames()
    );
    Ok(SessionReport {
        final_mode: service.mode(),
        ticks: service.tick_count(),
        last_record: marker.last_record(),
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = load_config(args.config_path.as_deref())?;
    let report = run_session(config, args.duration_ms, args.realtime)?;
    info!(
        "classroom-sim: ended in {:?} after {} ticks",
        report.final_mode, report.ticks
    );
    if let Some(record) = report.last_record {
        info!("classroom-sim: last authorization #{}", record.sequence);
    }
    Ok(())
}
