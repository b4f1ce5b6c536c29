//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns the mode FSM and the shared [`ControlCore`].
//! All I/O flows through port traits injected at call sites, so the whole
//! service runs unchanged against mock adapters on the host.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!    InputPort ──▶ │      ControlService      │ ──▶ AuthMarkerPort
//! ActuatorPort ◀── │ Scheduler · FSM · Fusion │
//!  DisplayPort ◀── └──────────────────────────┘
//! ```
//!
//! One call to [`ControlService::tick`] is one control-loop iteration:
//!
//! 1. poll the scheduler (timers may raise a signal or toggle outputs)
//! 2. poll keypad / RFID for the current mode
//! 3. in `Monitoring`: refresh sensors, compute PMV, and after each hold
//!    window evaluate the streak and comfort band
//! 4. step the FSM with whatever signal is left in the slot
//! 5. push changed actuator levels and redraw the screen if needed

use log::{info, warn};

use crate::auth::{self, EntryProgress, Key};
use crate::config::SystemConfig;
use crate::control::compute_pmv;
use crate::error::Result;
use crate::fsm::context::{ActuatorCommands, ControlCore};
use crate::fsm::states::build_mode_table;
use crate::fsm::{Fsm, Mode};
use crate::signal::InputSignal;

use super::display::StatusScreen;
use super::events::{AppEvent, TelemetryData};
use super::ports::{
    ActuatorPort, AuthMarkerPort, DisplayPort, EventSink, InputPort, LedId, SensorPort,
};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService {
    fsm: Fsm,
    core: ControlCore,
    screen: StatusScreen,
    /// Last levels pushed to the actuator port.  `None` until `start`.
    applied: Option<ActuatorCommands>,
    tick_count: u64,
}

impl ControlService {
    /// Validate `config` and build the service.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fsm: Fsm::new(build_mode_table(), Mode::Idle),
            core: ControlCore::new(config),
            screen: StatusScreen::new(),
            applied: None,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `Idle`, drive every output to its safe level and draw the
    /// first screen.
    pub fn start(
        &mut self,
        now_ms: u64,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        self.core.now_ms = now_ms;
        self.fsm.start(&mut self.core);
        self.apply_actuators(hw);
        self.screen.refresh(&self.core, hw);
        sink.emit(&AppEvent::Started(self.fsm.current_mode()));
        info!("ControlService started in {:?}", self.fsm.current_mode());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control-loop iteration at `now_ms`.
    ///
    /// `hw` satisfies every hardware port at once, which avoids a double
    /// mutable borrow while keeping the port boundary explicit.
    pub fn tick<H>(
        &mut self,
        now_ms: u64,
        hw: &mut H,
        marker: &mut impl AuthMarkerPort,
        sink: &mut impl EventSink,
    ) where
        H: SensorPort + ActuatorPort + InputPort + DisplayPort,
    {
        self.tick_count += 1;
        self.core.now_ms = now_ms;
        self.core.inputs.button_down = hw.button_pressed();

        // 1. Timers
        self.core.poll_scheduler();

        // 2. Keypad / RFID
        self.poll_inputs(hw, marker, sink);

        // 3. Sensing and comfort evaluation
        if self.core.mode == Mode::Monitoring {
            self.monitor(hw, sink);
        }

        // 4. FSM step
        if let Some((from, to)) = self.fsm.tick(&mut self.core) {
            sink.emit(&AppEvent::ModeChanged { from, to });
        }

        // 5. Outputs
        self.apply_actuators(hw);
        self.screen.refresh(&self.core, hw);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.fsm.current_mode()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Read-only view of the shared context (streak, scheduler, readings).
    pub fn core(&self) -> &ControlCore {
        &self.core
    }

    pub fn commands(&self) -> ActuatorCommands {
        self.core.commands
    }

    pub fn config(&self) -> &SystemConfig {
        &self.core.config
    }

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        let sample = self
            .core
            .monitor
            .sample
            .unwrap_or_else(|| self.core.fusion.current());
        TelemetryData {
            mode: self.fsm.current_mode(),
            temperature_c: sample.temperature_c,
            humidity_pct: sample.humidity_pct,
            light: sample.light,
            pmv: self
                .core
                .monitor
                .pmv
                .unwrap_or_else(|| compute_pmv(sample.temperature_c, sample.humidity_pct)),
            streak: self.core.streak.count(),
            relay_on: self.core.commands.relay,
            servo_deg: self.core.commands.servo_deg,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn poll_inputs(
        &mut self,
        hw: &mut impl InputPort,
        marker: &mut impl AuthMarkerPort,
        sink: &mut impl EventSink,
    ) {
        // Keys are drained every iteration; modes that don't use them drop them.
        let key = hw.poll_key().and_then(Key::from_char);
        let core = &mut self.core;

        match core.mode {
            Mode::Idle | Mode::Authenticating => {
                let Some(key) = key else { return };
                match core.code_entry.push(key, &core.config.access_code) {
                    EntryProgress::Complete(Ok(())) => {
                        info!("access code accepted");
                        core.signal.raise(InputSignal::CorrectCode);
                    }
                    EntryProgress::Complete(Err(fault)) => {
                        sink.emit(&AppEvent::AccessDenied(fault));
                        core.signal.raise(InputSignal::WrongCode);
                    }
                    EntryProgress::Pending(_) | EntryProgress::Cleared | EntryProgress::Ignored => {}
                }
            }
            Mode::TagWait if core.tag.uid.is_none() => {
                let Some(uid) = hw.poll_tag() else { return };
                match auth::check_tag(uid, &core.config.authorized_tags) {
                    Ok(uid) => {
                        core.tag.uid = Some(uid);
                        marker.mark_authorized(uid);
                        sink.emit(&AppEvent::Authorized(uid));
                        core.signal.raise(InputSignal::ValidTag);
                    }
                    Err(fault) => {
                        core.tag.rejected = core.tag.rejected.saturating_add(1);
                        sink.emit(&AppEvent::AccessDenied(fault));
                    }
                }
            }
            Mode::Alarm if key == Some(Key::Hash) => {
                core.signal.raise(InputSignal::AckKey);
            }
            _ => {}
        }
    }

    fn monitor(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        let core = &mut self.core;

        let sample = core.fusion.refresh(hw);
        for fault in core.fusion.take_faults() {
            sink.emit(&AppEvent::SensorFault(fault));
        }
        let pmv = compute_pmv(sample.temperature_c, sample.humidity_pct);
        core.monitor.sample = Some(sample);
        core.monitor.pmv = Some(pmv);

        // Inside the hold window: readings only, no signals.
        if !core.monitor.evaluation_due {
            return;
        }
        core.monitor.evaluation_due = false;

        if core.streak.observe(sample.temperature_c) {
            warn!(
                "temperature above {:.1} C for {} evaluations",
                core.config.streak_high_c,
                core.streak.count()
            );
            sink.emit(&AppEvent::AlarmRaised {
                streak: core.streak.count(),
                temperature_c: sample.temperature_c,
            });
            core.signal.raise(InputSignal::AlarmCondition);
        } else if pmv > core.config.comfort_high_pmv && !core.streak.is_triggered() {
            core.signal.raise(InputSignal::ComfortHigh);
        } else if pmv < core.config.comfort_low_pmv {
            core.signal.raise(InputSignal::ComfortLow);
        }

        sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
    }

    /// Push actuator levels that changed since the last call.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        let cmds = self.core.commands;
        let first = self.applied.is_none();
        let prev = self.applied.unwrap_or(cmds);

        if first || prev.relay != cmds.relay {
            hw.set_relay(cmds.relay);
        }
        if first || prev.servo_deg != cmds.servo_deg {
            hw.set_servo_angle(cmds.servo_deg);
        }
        if first || prev.buzzer != cmds.buzzer {
            hw.set_buzzer(cmds.buzzer);
        }
        for (led, now, before) in [
            (LedId::Red, cmds.red, prev.red),
            (LedId::Blue, cmds.blue, prev.blue),
            (LedId::Green, cmds.green, prev.green),
        ] {
            if first || now != before {
                hw.set_led(led, now);
            }
        }

        self.applied = Some(cmds);
    }
}
