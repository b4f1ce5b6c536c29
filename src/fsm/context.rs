//! Shared mutable context threaded through every mode handler.
//!
//! `ControlCore` is the single struct that mode handlers read from and
//! write to: current mode, clock, the pending input signal, scheduler,
//! actuator commands, sensor fusion, streak tracker and the small bits of
//! per-mode progress.  Each field has exactly one writer:
//!
//! | Field            | Written by                              |
//! |------------------|-----------------------------------------|
//! | `mode`           | FSM engine transition step              |
//! | `signal`         | scheduler tasks, input polling, monitor |
//! | `fusion`         | monitoring refresh                      |
//! | `streak`         | monitoring evaluation, Alarm exit       |
//! | `commands`       | mode handlers, blink/buzzer tasks       |

use crate::app::ports::{ScheduleFiredKind, SchedulerDelegate};
use crate::auth::{CodeEntry, TagUid};
use crate::config::SystemConfig;
use crate::control::StreakTracker;
use crate::scheduler::{Cadence, Scheduler, TaskId};
use crate::sensors::{SensorFusion, SensorSample};
use crate::signal::{InputSignal, SignalSlot};

use super::Mode;

// ---------------------------------------------------------------------------
// Actuator commands (written by handlers and tasks; applied by the service)
// ---------------------------------------------------------------------------

/// Desired actuator levels.  The service pushes changes to the
/// [`ActuatorPort`](crate::app::ports::ActuatorPort) after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Fan relay.
    pub relay: bool,
    /// Vent servo angle (degrees).
    pub servo_deg: u8,
    pub buzzer: bool,
    pub red: bool,
    pub blue: bool,
    pub green: bool,
}

impl ActuatorCommands {
    /// Everything off, vent at `closed_deg`.
    pub fn safe(closed_deg: u8) -> Self {
        Self {
            relay: false,
            servo_deg: closed_deg,
            buzzer: false,
            red: false,
            blue: false,
            green: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-mode progress
// ---------------------------------------------------------------------------

/// Raw input levels sampled at the top of each iteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputLevels {
    pub button_down: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TagProgress {
    /// A valid tag has been accepted in this visit; settling.
    pub validated: bool,
    /// UID of the accepted tag.
    pub uid: Option<TagUid>,
    /// Rejected reads in this visit.
    pub rejected: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorState {
    /// Set by the hold task; cleared when the evaluation runs.
    pub evaluation_due: bool,
    /// Latest stabilized readings.
    pub sample: Option<SensorSample>,
    /// Latest comfort index.
    pub pmv: Option<f32>,
}

// ---------------------------------------------------------------------------
// ControlCore
// ---------------------------------------------------------------------------

pub struct ControlCore {
    // -- Mode & timing --
    pub mode: Mode,
    /// Milliseconds since boot, set at the top of each iteration.
    pub now_ms: u64,
    /// `now_ms` at the last transition.
    pub mode_entered_ms: u64,

    // -- Configuration --
    pub config: SystemConfig,

    // -- Shared resources --
    pub signal: SignalSlot,
    pub scheduler: Scheduler,
    pub commands: ActuatorCommands,
    pub fusion: SensorFusion,
    pub streak: StreakTracker,

    // -- Per-mode progress --
    pub inputs: InputLevels,
    pub code_entry: CodeEntry,
    pub tag: TagProgress,
    pub monitor: MonitorState,
}

impl ControlCore {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            mode: Mode::Idle,
            now_ms: 0,
            mode_entered_ms: 0,
            signal: SignalSlot::new(),
            scheduler: Scheduler::new(),
            commands: ActuatorCommands::safe(config.servo_closed_deg),
            fusion: SensorFusion::new(&config),
            streak: StreakTracker::new(
                config.streak_high_c,
                config.streak_low_c,
                config.streak_trigger,
            ),
            inputs: InputLevels::default(),
            code_entry: CodeEntry::new(),
            tag: TagProgress::default(),
            monitor: MonitorState::default(),
            config,
        }
    }

    /// Start `id` on behalf of the current mode.
    pub fn start_task(&mut self, id: TaskId, cadence: Cadence) {
        self.scheduler.start(id, self.mode, cadence, self.now_ms);
    }

    pub fn stop_task(&mut self, id: TaskId) {
        self.scheduler.stop(id);
    }

    /// Milliseconds spent in the current mode.
    pub fn ms_in_mode(&self) -> u64 {
        self.now_ms.saturating_sub(self.mode_entered_ms)
    }

    /// Poll the scheduler at `now_ms`, applying task effects to the core.
    pub fn poll_scheduler(&mut self) {
        let mut effects = TaskEffects {
            commands: &mut self.commands,
            signal: &mut self.signal,
            monitor: &mut self.monitor,
            button_down: self.inputs.button_down,
        };
        self.scheduler.update(self.now_ms, &mut effects);
    }
}

// ---------------------------------------------------------------------------
// Task effects
// ---------------------------------------------------------------------------

/// What each task does when it fires.  Borrows only the fields a task may
/// touch; there is no path back to the scheduler.
struct TaskEffects<'a> {
    commands: &'a mut ActuatorCommands,
    signal: &'a mut SignalSlot,
    monitor: &'a mut MonitorState,
    button_down: bool,
}

impl SchedulerDelegate for TaskEffects<'_> {
    fn on_task_fired(&mut self, id: TaskId, kind: ScheduleFiredKind) {
        let phase_on = kind == ScheduleFiredKind::PhaseOn;
        match id {
            TaskId::BlinkRed | TaskId::FastBlinkRed => self.commands.red = !self.commands.red,
            TaskId::BlinkBlue => self.commands.blue = phase_on,
            TaskId::AlarmBlink => self.commands.red = phase_on,
            TaskId::AlarmBuzzer => self.commands.buzzer = phase_on,
            TaskId::AutoReturn | TaskId::TagSettle | TaskId::TagWindow | TaskId::EntryTimeout => {
                self.signal.raise(InputSignal::Timeout);
            }
            TaskId::MonitorHold => self.monitor.evaluation_due = true,
            TaskId::ButtonDebounce => {
                if self.button_down {
                    self.signal.raise(InputSignal::ButtonPress);
                }
            }
        }
    }
}
