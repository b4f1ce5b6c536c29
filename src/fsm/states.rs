//! Mode handler functions and the table builder.
//!
//! Each mode has up to three handlers: `enter`, `exit` and `update`.
//! Every task a mode's `enter` (or `update`) starts is stopped by its
//! `exit`; the engine's ownership sweep is only a backstop.

use log::{debug, info};

use super::context::{ActuatorCommands, ControlCore, TagProgress};
use super::{Mode, ModeDescriptor};
use crate::scheduler::{Cadence, TaskId};
use crate::signal::InputSignal;

/// Build the mode table.  Order MUST match the `Mode` discriminants.
pub fn build_mode_table() -> [ModeDescriptor; Mode::COUNT] {
    [
        ModeDescriptor {
            id: Mode::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        ModeDescriptor {
            id: Mode::Authenticating,
            name: "Authenticating",
            on_enter: Some(auth_enter),
            on_exit: Some(auth_exit),
            on_update: auth_update,
        },
        ModeDescriptor {
            id: Mode::Locked,
            name: "Locked",
            on_enter: Some(locked_enter),
            on_exit: Some(locked_exit),
            on_update: locked_update,
        },
        ModeDescriptor {
            id: Mode::TagWait,
            name: "TagWait",
            on_enter: Some(tag_wait_enter),
            on_exit: Some(tag_wait_exit),
            on_update: tag_wait_update,
        },
        ModeDescriptor {
            id: Mode::Monitoring,
            name: "Monitoring",
            on_enter: Some(monitoring_enter),
            on_exit: Some(monitoring_exit),
            on_update: monitoring_update,
        },
        ModeDescriptor {
            id: Mode::ComfortHot,
            name: "ComfortHot",
            on_enter: Some(hot_enter),
            on_exit: Some(hot_exit),
            on_update: return_on_timeout,
        },
        ModeDescriptor {
            id: Mode::ComfortCold,
            name: "ComfortCold",
            on_enter: Some(cold_enter),
            on_exit: Some(cold_exit),
            on_update: return_on_timeout,
        },
        ModeDescriptor {
            id: Mode::Alarm,
            name: "Alarm",
            on_enter: Some(alarm_enter),
            on_exit: Some(alarm_exit),
            on_update: alarm_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════
//  IDLE: outputs safe, waiting for the first digit
// ═══════════════════════════════════════════════════════════════

fn idle_enter(core: &mut ControlCore) {
    core.commands = ActuatorCommands::safe(core.config.servo_closed_deg);
}

fn idle_update(core: &mut ControlCore, signal: InputSignal) -> Option<Mode> {
    match signal {
        // A one-digit code completes without leaving Idle.
        InputSignal::CorrectCode => Some(Mode::TagWait),
        InputSignal::WrongCode => Some(Mode::Locked),
        _ if core.code_entry.in_progress() => Some(Mode::Authenticating),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════
//  AUTHENTICATING: collecting the rest of the code
// ═══════════════════════════════════════════════════════════════

fn auth_enter(core: &mut ControlCore) {
    let delay_ms = core.config.code_entry_timeout_ms;
    core.start_task(TaskId::EntryTimeout, Cadence::OneShot { delay_ms });
}

fn auth_exit(core: &mut ControlCore) {
    core.stop_task(TaskId::EntryTimeout);
    core.code_entry.clear();
}

fn auth_update(_core: &mut ControlCore, signal: InputSignal) -> Option<Mode> {
    match signal {
        InputSignal::CorrectCode => Some(Mode::TagWait),
        InputSignal::WrongCode => Some(Mode::Locked),
        InputSignal::Timeout => {
            info!("code entry timed out");
            Some(Mode::Idle)
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════
//  LOCKED: red blink until the physical button is pressed
// ═══════════════════════════════════════════════════════════════

fn locked_enter(core: &mut ControlCore) {
    core.commands.red = true;
    let interval_ms = core.config.blink_red_ms;
    core.start_task(TaskId::BlinkRed, Cadence::Periodic { interval_ms });
}

fn locked_exit(core: &mut ControlCore) {
    core.stop_task(TaskId::BlinkRed);
    core.stop_task(TaskId::ButtonDebounce);
    core.commands.red = false;
}

fn locked_update(core: &mut ControlCore, signal: InputSignal) -> Option<Mode> {
    if signal == InputSignal::ButtonPress {
        return Some(Mode::Idle);
    }
    if core.inputs.button_down && !core.scheduler.is_active(TaskId::ButtonDebounce) {
        let delay_ms = core.config.button_debounce_ms;
        core.start_task(TaskId::ButtonDebounce, Cadence::OneShot { delay_ms });
    }
    None
}

// ═══════════════════════════════════════════════════════════════
//  TAG WAIT: confirmation window, then settle after a valid tag
// ═══════════════════════════════════════════════════════════════

fn tag_wait_enter(core: &mut ControlCore) {
    core.tag = TagProgress::default();
    let delay_ms = core.config.tag_window_ms;
    core.start_task(TaskId::TagWindow, Cadence::OneShot { delay_ms });
}

fn tag_wait_exit(core: &mut ControlCore) {
    core.stop_task(TaskId::TagWindow);
    core.stop_task(TaskId::TagSettle);
}

fn tag_wait_update(core: &mut ControlCore, signal: InputSignal) -> Option<Mode> {
    match signal {
        InputSignal::ValidTag if !core.tag.validated => {
            core.tag.validated = true;
            core.stop_task(TaskId::TagWindow);
            let delay_ms = core.config.tag_settle_ms;
            core.start_task(TaskId::TagSettle, Cadence::OneShot { delay_ms });
            debug!("tag accepted, settling for {} ms", delay_ms);
            None
        }
        InputSignal::Timeout if core.tag.validated => Some(Mode::Monitoring),
        InputSignal::Timeout => {
            info!("no valid tag within window");
            Some(Mode::Idle)
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════
//  MONITORING: sensing and comfort evaluation
// ═══════════════════════════════════════════════════════════════

fn monitoring_enter(core: &mut ControlCore) {
    // No evaluation until the hold task has fired once.
    core.monitor.evaluation_due = false;
    core.commands.green = true;
    let interval_ms = core.config.monitor_hold_ms;
    core.start_task(TaskId::MonitorHold, Cadence::Periodic { interval_ms });
}

fn monitoring_exit(core: &mut ControlCore) {
    core.stop_task(TaskId::MonitorHold);
    core.monitor.evaluation_due = false;
    core.commands.green = false;
}

fn monitoring_update(core: &mut ControlCore, signal: InputSignal) -> Option<Mode> {
    let triggered = core.streak.is_triggered();
    // Alarm is checked first.
    match signal {
        InputSignal::AlarmCondition if triggered => Some(Mode::Alarm),
        InputSignal::ComfortHigh if !triggered => Some(Mode::ComfortHot),
        InputSignal::ComfortLow => Some(Mode::ComfortCold),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════
//  COMFORT HOT: fan on for a fixed run, then back to monitoring
// ═══════════════════════════════════════════════════════════════

fn hot_enter(core: &mut ControlCore) {
    core.commands.relay = true;
    core.commands.red = true;
    let interval_ms = core.config.fast_blink_red_ms;
    core.start_task(TaskId::FastBlinkRed, Cadence::Periodic { interval_ms });
    let delay_ms = core.config.hot_return_ms;
    core.start_task(TaskId::AutoReturn, Cadence::OneShot { delay_ms });
}

fn hot_exit(core: &mut ControlCore) {
    core.stop_task(TaskId::FastBlinkRed);
    core.stop_task(TaskId::AutoReturn);
    core.commands.red = false;
    core.commands.relay = false;
}

// ═══════════════════════════════════════════════════════════════
//  COMFORT COLD: vent open for a fixed run, then back to monitoring
// ═══════════════════════════════════════════════════════════════

fn cold_enter(core: &mut ControlCore) {
    core.commands.servo_deg = core.config.servo_open_deg;
    core.commands.blue = true;
    let (on_ms, off_ms) = (core.config.blink_blue_on_ms, core.config.blink_blue_off_ms);
    core.start_task(TaskId::BlinkBlue, Cadence::TwoPhase { on_ms, off_ms });
    let delay_ms = core.config.cold_return_ms;
    core.start_task(TaskId::AutoReturn, Cadence::OneShot { delay_ms });
}

fn cold_exit(core: &mut ControlCore) {
    core.stop_task(TaskId::BlinkBlue);
    core.stop_task(TaskId::AutoReturn);
    core.commands.blue = false;
    core.commands.servo_deg = core.config.servo_closed_deg;
}

fn return_on_timeout(_core: &mut ControlCore, signal: InputSignal) -> Option<Mode> {
    (signal == InputSignal::Timeout).then_some(Mode::Monitoring)
}

// ═══════════════════════════════════════════════════════════════
//  ALARM: strobe and buzzer until acknowledged
// ═══════════════════════════════════════════════════════════════

fn alarm_enter(core: &mut ControlCore) {
    core.commands.red = true;
    core.commands.buzzer = true;
    let (on_ms, off_ms) = (core.config.alarm_blink_on_ms, core.config.alarm_blink_off_ms);
    core.start_task(TaskId::AlarmBlink, Cadence::TwoPhase { on_ms, off_ms });
    let (on_ms, off_ms) = (core.config.buzzer_on_ms, core.config.buzzer_off_ms);
    core.start_task(TaskId::AlarmBuzzer, Cadence::TwoPhase { on_ms, off_ms });
}

fn alarm_exit(core: &mut ControlCore) {
    core.stop_task(TaskId::AlarmBlink);
    core.stop_task(TaskId::AlarmBuzzer);
    core.commands.red = false;
    core.commands.buzzer = false;
    core.streak.reset();
}

fn alarm_update(_core: &mut ControlCore, signal: InputSignal) -> Option<Mode> {
    (signal == InputSignal::AckKey).then_some(Mode::Idle)
}
