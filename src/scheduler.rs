//! Cooperative task scheduler.
//!
//! Every timed behavior of the controller (blink patterns, buzzer cadence,
//! debounce and settle windows, auto-return timers) is a task in a fixed
//! table.  The control loop polls the table once per iteration; due tasks
//! are reported to a [`SchedulerDelegate`], which owns the side effects.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Task table                               │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐                 │
//! │  │ One-shot  │  │ Periodic  │  │ Two-phase │                 │
//! │  │ timeouts  │  │ blinks    │  │ patterns  │                 │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘                 │
//! │        │              │              │                       │
//! │        ▼              ▼              ▼                       │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              SchedulerDelegate                         │  │
//! │  │   (toggles actuator commands or raises the signal)     │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          ▼                                   │
//! │                 ControlService.tick()                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tasks never block and the delegate has no handle back to the scheduler,
//! so a firing task cannot start or stop another one.  A late poll delays
//! the fire to that poll; nothing is backfilled.

use log::{debug, info};

use crate::app::ports::{ScheduleFiredKind, SchedulerDelegate};
use crate::fsm::Mode;

// ═══════════════════════════════════════════════════════════════
//  Task identity and cadence
// ═══════════════════════════════════════════════════════════════

/// Every task the controller knows about.  One slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskId {
    /// Slow red blink while locked out.
    BlinkRed = 0,
    /// Fast red blink while the fan runs.
    FastBlinkRed = 1,
    /// Asymmetric blue blink while the vent is open.
    BlinkBlue = 2,
    /// Red strobe while the alarm sounds.
    AlarmBlink = 3,
    /// Buzzer cadence while the alarm sounds.
    AlarmBuzzer = 4,
    /// Return from a comfort excursion to monitoring.
    AutoReturn = 5,
    /// Delay between a valid tag and monitoring.
    TagSettle = 6,
    /// Window for presenting a tag.
    TagWindow = 7,
    /// Abandon a half-typed code.
    EntryTimeout = 8,
    /// Gate between monitoring evaluations.
    MonitorHold = 9,
    /// Confirm the unlock button is still held.
    ButtonDebounce = 10,
}

impl TaskId {
    pub const COUNT: usize = 11;

    pub const ALL: [TaskId; Self::COUNT] = [
        Self::BlinkRed,
        Self::FastBlinkRed,
        Self::BlinkBlue,
        Self::AlarmBlink,
        Self::AlarmBuzzer,
        Self::AutoReturn,
        Self::TagSettle,
        Self::TagWindow,
        Self::EntryTimeout,
        Self::MonitorHold,
        Self::ButtonDebounce,
    ];
}

/// How a task repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Fire once after `delay_ms`, then deactivate.
    OneShot { delay_ms: u32 },
    /// Fire every `interval_ms`.
    Periodic { interval_ms: u32 },
    /// Alternate between an on phase and an off phase of different lengths.
    /// The task starts in the on phase; the first fire switches to off.
    TwoPhase { on_ms: u32, off_ms: u32 },
}

/// Bookkeeping for one task slot.
#[derive(Debug, Clone, Copy)]
struct TaskSlot {
    cadence: Cadence,
    due_at_ms: u64,
    owner: Mode,
    /// Two-phase only: `true` while in the on phase.
    phase_on: bool,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

pub struct Scheduler {
    /// Indexed by `TaskId as usize`.  `None` = inactive.
    slots: [Option<TaskSlot>; TaskId::COUNT],
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            slots: [None; TaskId::COUNT],
        }
    }

    /// Arm `id` on behalf of `owner`.  Re-arming an active task restarts it.
    pub fn start(&mut self, id: TaskId, owner: Mode, cadence: Cadence, now_ms: u64) {
        let first_ms = match cadence {
            Cadence::OneShot { delay_ms } => delay_ms,
            Cadence::Periodic { interval_ms } => interval_ms,
            Cadence::TwoPhase { on_ms, .. } => on_ms,
        };
        debug!("task {:?} started by {:?} ({:?})", id, owner, cadence);
        self.slots[id as usize] = Some(TaskSlot {
            cadence,
            due_at_ms: now_ms + u64::from(first_ms),
            owner,
            phase_on: true,
        });
    }

    /// Deactivate `id`.  Stopping an inactive task is a no-op.
    pub fn stop(&mut self, id: TaskId) {
        if self.slots[id as usize].take().is_some() {
            debug!("task {:?} stopped", id);
        }
    }

    /// Stop every task started by `owner`.  Returns how many were live.
    pub fn stop_owned_by(&mut self, owner: Mode) -> usize {
        let mut stopped = 0;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_some_and(|s| s.owner == owner) {
                info!("Scheduler: reclaimed {:?} from {:?}", TaskId::ALL[i], owner);
                *slot = None;
                stopped += 1;
            }
        }
        stopped
    }

    /// Poll every task.  Call once per control-loop iteration.
    pub fn update(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(task) = slot else { continue };
            if now_ms < task.due_at_ms {
                continue;
            }
            let id = TaskId::ALL[i];
            let cadence = task.cadence;

            match cadence {
                Cadence::OneShot { .. } => {
                    *slot = None;
                    delegate.on_task_fired(id, ScheduleFiredKind::OneShot);
                }
                Cadence::Periodic { interval_ms } => {
                    task.due_at_ms = now_ms + u64::from(interval_ms);
                    delegate.on_task_fired(id, ScheduleFiredKind::Periodic);
                }
                Cadence::TwoPhase { on_ms, off_ms } => {
                    task.phase_on = !task.phase_on;
                    let (next_ms, kind) = if task.phase_on {
                        (on_ms, ScheduleFiredKind::PhaseOn)
                    } else {
                        (off_ms, ScheduleFiredKind::PhaseOff)
                    };
                    task.due_at_ms = now_ms + u64::from(next_ms);
                    delegate.on_task_fired(id, kind);
                }
            }
        }
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.slots[id as usize].is_some()
    }

    /// Mode that started `id`, if it is live.
    pub fn owner_of(&self, id: TaskId) -> Option<Mode> {
        self.slots[id as usize].map(|s| s.owner)
    }

    /// Number of live tasks.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
